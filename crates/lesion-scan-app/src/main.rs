#![warn(missing_docs)]
//! # lesion-scan-app binary
//!
//! Headless entry point for lesion-scan: reports the resolved runtime
//! configuration. The interactive single-page shell is hosted separately and
//! drives the same [`lesion_scan_app::SessionController`].

/// CLI entry point.
fn main() {
    println!("lesion-scan-app {}", lesion_scan_app::app_version());
    println!(
        "predict_endpoint={} ({})",
        lesion_scan_app::predict_endpoint_from_env(),
        lesion_scan_app::PREDICT_ENDPOINT_ENV
    );
}
