//! Integration tests for the local validation short-circuit.

mod common;

use common::{ScriptedTransport, clinical_controller, fixture_image_file, image_only_controller};
use lesion_scan_submit::{MISSING_DIAGNOSIS_MESSAGE, MISSING_IMAGE_MESSAGE, WorkflowState};

#[test]
fn validation_gate_tests_reject_submit_without_image() {
    let transport = ScriptedTransport::success("Other (Benign)", "81%");
    let mut controller = clinical_controller(transport.clone());

    assert_eq!(controller.submit(), WorkflowState::Failure);
    assert_eq!(controller.error_message(), Some(MISSING_IMAGE_MESSAGE));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn validation_gate_tests_reject_submit_without_diagnosis() {
    let transport = ScriptedTransport::success("Other (Benign)", "81%");
    let mut controller = clinical_controller(transport.clone());

    assert!(controller.offer_file(fixture_image_file()).is_accepted());
    assert_eq!(controller.submit(), WorkflowState::Failure);
    assert_eq!(controller.error_message(), Some(MISSING_DIAGNOSIS_MESSAGE));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn validation_gate_tests_image_only_variant_needs_no_diagnosis() {
    let transport = ScriptedTransport::success("Other (Benign)", "81%");
    let mut controller = image_only_controller(transport.clone());

    assert!(controller.offer_file(fixture_image_file()).is_accepted());
    assert_eq!(controller.submit(), WorkflowState::Success);
    assert_eq!(transport.call_count(), 1);
}
