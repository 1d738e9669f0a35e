//! Integration tests for variant-dependent payload assembly.

mod common;

use common::{ScriptedTransport, clinical_controller, fixture_image_file, image_only_controller};
use lesion_scan_core::Diagnosis;
use lesion_scan_submit::WorkflowState;

#[test]
fn variant_payload_tests_clinical_envelope_carries_metadata_fields() {
    let transport = ScriptedTransport::success("Other (Benign)", "81%");
    let mut controller = clinical_controller(transport.clone());

    assert!(controller.offer_file(fixture_image_file()).is_accepted());
    controller.set_patient_id("PT-28491");
    controller.set_diagnosis(Some(Diagnosis::VascularLesion));
    controller.set_lesion_location("Left Forearm");
    assert_eq!(controller.submit(), WorkflowState::Success);

    let envelopes = transport.captured_envelopes();
    assert_eq!(envelopes.len(), 1);
    assert_eq!(
        envelopes[0].fields,
        vec![
            ("patient_id".to_string(), "PT-28491".to_string()),
            ("diagnosis".to_string(), "Vascular Lesion".to_string()),
            ("lesion_location".to_string(), "Left Forearm".to_string()),
        ]
    );
}

#[test]
fn variant_payload_tests_image_only_envelope_has_no_text_fields() {
    let transport = ScriptedTransport::success("Other (Benign)", "81%");
    let mut controller = image_only_controller(transport.clone());

    assert!(controller.offer_file(fixture_image_file()).is_accepted());
    // Metadata setters are inert without the clinical capability.
    controller.set_patient_id("PT-28491");
    controller.set_diagnosis(Some(Diagnosis::Melanoma));
    assert!(controller.metadata().is_none());

    assert_eq!(controller.submit(), WorkflowState::Success);

    let envelopes = transport.captured_envelopes();
    assert_eq!(envelopes.len(), 1);
    assert!(envelopes[0].fields.is_empty());
    assert_eq!(envelopes[0].content_type, "image/jpeg");
}
