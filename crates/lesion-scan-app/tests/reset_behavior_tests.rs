//! Integration tests for the explicit session reset.

mod common;

use common::{ScriptedTransport, clinical_controller, fixture_image_file};
use lesion_scan_core::{Diagnosis, LesionMetadata};
use lesion_scan_submit::WorkflowState;

#[test]
fn reset_behavior_tests_restore_exact_initial_state() {
    let transport = ScriptedTransport::success("Melanocytic (Risk)", "87%");
    let mut controller = clinical_controller(transport);

    assert!(controller.offer_file(fixture_image_file()).is_accepted());
    controller.set_patient_id("PT-28491");
    controller.set_diagnosis(Some(Diagnosis::Melanoma));
    controller.set_lesion_location("Upper Left Back");
    assert_eq!(controller.submit(), WorkflowState::Success);

    controller.reset();

    assert_eq!(controller.workflow_state(), WorkflowState::Idle);
    assert!(controller.preview_uri().is_none());
    assert!(controller.result_view().is_none());
    assert!(controller.error_message().is_none());
    assert!(controller.last_fingerprint().is_none());
    assert_eq!(controller.metadata(), Some(&LesionMetadata::default()));
    assert!(!controller.can_submit());
}

#[test]
fn reset_behavior_tests_clear_failure_state_too() {
    let transport = ScriptedTransport::success("Other (Benign)", "81%");
    let mut controller = clinical_controller(transport);

    assert_eq!(controller.submit(), WorkflowState::Failure);
    controller.reset();

    assert_eq!(controller.workflow_state(), WorkflowState::Idle);
    assert!(controller.error_message().is_none());
}
