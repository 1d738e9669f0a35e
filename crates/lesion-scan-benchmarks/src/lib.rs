#![warn(missing_docs)]
//! # lesion-scan-benchmarks
//!
//! Carrier crate for lightweight pipeline latency guardrails; see
//! `tests/nfr_smoke.rs`.
