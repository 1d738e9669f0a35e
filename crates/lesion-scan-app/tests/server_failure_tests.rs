//! Integration tests for non-success response handling.

mod common;

use common::{Script, ScriptedTransport, fixture_image_file, image_only_controller};
use lesion_scan_submit::{SERVER_FAILURE_MESSAGE, WorkflowState};

#[test]
fn server_failure_tests_use_fixed_message_regardless_of_body() {
    let transport = ScriptedTransport::new(vec![Script::Respond(
        500,
        r#"{"detail":"Internal Server Error during prediction"}"#.to_string(),
    )]);
    let mut controller = image_only_controller(transport);

    assert!(controller.offer_file(fixture_image_file()).is_accepted());
    assert_eq!(controller.submit(), WorkflowState::Failure);
    assert_eq!(controller.error_message(), Some(SERVER_FAILURE_MESSAGE));
}

#[test]
fn server_failure_tests_treat_any_non_success_status_the_same() {
    for status in [400_u16, 404, 503] {
        let transport = ScriptedTransport::new(vec![Script::Respond(status, String::new())]);
        let mut controller = image_only_controller(transport);

        assert!(controller.offer_file(fixture_image_file()).is_accepted());
        assert_eq!(controller.submit(), WorkflowState::Failure);
        assert_eq!(controller.error_message(), Some(SERVER_FAILURE_MESSAGE));
    }
}
