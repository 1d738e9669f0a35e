//! Integration tests for endpoint configuration and policy.

mod common;

use common::ScriptedTransport;
use lesion_scan_app::{
    AppError, DEFAULT_PREDICT_ENDPOINT, PREDICT_ENDPOINT_ENV, SessionController, SessionOptions,
    predict_endpoint_from_env,
};

#[test]
fn endpoint_policy_tests_reject_non_predict_paths() {
    let transport = ScriptedTransport::success("Other (Benign)", "81%");
    let result = SessionController::new(
        SessionOptions::clinical("http://localhost:8000/classify"),
        transport,
    );
    assert!(matches!(result, Err(AppError::Submit(_))));
}

#[test]
fn endpoint_policy_tests_env_override_replaces_default() {
    // Safety:
    // - Integration tests mutate process env in a single-threaded test body.
    // - We reset the variable before returning.
    unsafe { std::env::set_var(PREDICT_ENDPOINT_ENV, "http://inference.local:9000/predict") };
    assert_eq!(
        predict_endpoint_from_env(),
        "http://inference.local:9000/predict"
    );

    // Safety: see rationale above.
    unsafe { std::env::remove_var(PREDICT_ENDPOINT_ENV) };
    assert_eq!(predict_endpoint_from_env(), DEFAULT_PREDICT_ENDPOINT);
}
