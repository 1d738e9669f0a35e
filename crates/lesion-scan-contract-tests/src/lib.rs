#![warn(missing_docs)]
//! # lesion-scan-contract-tests
//!
//! Carrier crate for frozen wire-contract schema validation; see
//! `tests/contract_validation.rs`.
