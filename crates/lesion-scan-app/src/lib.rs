#![warn(missing_docs)]
//! # lesion-scan-app
//!
//! ## Purpose
//! Orchestrates capture, clinical metadata, submission, and result
//! presentation for `lesion-scan`.
//!
//! ## Responsibilities
//! - Run the session workflow as one parameterized controller; clinical
//!   metadata capture is a configuration capability, not a second
//!   implementation.
//! - Enforce the submit gates: image present, diagnosis present when the
//!   clinical capability is on, at most one request in flight.
//! - Wire capture acceptance to result invalidation and the explicit reset
//!   to a full session wipe.
//! - Project session state into a flat status snapshot for shells.
//!
//! ## Data flow
//! Capture offering / picker + metadata edits -> [`SessionController`] ->
//! envelope assembly and one prediction request -> terminal state ->
//! [`SessionStatus`] / [`lesion_scan_ui::ResultView`] projection.
//!
//! ## Ownership and lifetimes
//! The controller owns every subsystem for the session lifetime; shells hold
//! owned snapshots, never borrows into workflow state.
//!
//! ## Error model
//! Subsystem construction failures are wrapped in [`AppError`]. Workflow
//! failures are not Rust errors: they resolve into the `Failure` state with a
//! user-facing message and stay recoverable by user action.
//!
//! ## Security and privacy notes
//! Patient identifiers and image bytes pass through the controller without
//! being logged or persisted.

use std::sync::Arc;

use lesion_scan_capture::{
    CaptureError, CaptureOutcome, CaptureSurface, ImageSource, SelectedFile,
};
use lesion_scan_core::{Diagnosis, LesionMetadata};
use lesion_scan_inference_contract::PredictionResponse;
use lesion_scan_submit::{
    MISSING_DIAGNOSIS_MESSAGE, MISSING_IMAGE_MESSAGE, SubmissionMachine, SubmitClient, SubmitError,
    SubmitOptions, SubmitTransport, WorkflowState, build_envelope, failure_from_transport,
    interpret_response, submission_fingerprint,
};
use lesion_scan_ui::{ResultView, present_result};
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("LESION_SCAN_VERSION");

/// Prediction endpoint used when no override is configured.
pub const DEFAULT_PREDICT_ENDPOINT: &str = "http://localhost:8000/predict";

/// Environment variable overriding the prediction endpoint.
pub const PREDICT_ENDPOINT_ENV: &str = "LESION_SCAN_PREDICT_ENDPOINT";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Resolves the prediction endpoint from the environment.
///
/// Semantics:
/// - Unset or blank => [`DEFAULT_PREDICT_ENDPOINT`].
/// - Any other value => used verbatim (validated at client construction).
pub fn predict_endpoint_from_env() -> String {
    match std::env::var(PREDICT_ENDPOINT_ENV) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => DEFAULT_PREDICT_ENDPOINT.to_string(),
    }
}

/// Session construction options.
///
/// The two deployable variants differ only in `metadata_capture`; everything
/// else is the shared workflow skeleton.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Prediction endpoint injected at workflow construction.
    pub endpoint: String,
    /// Whether the clinical metadata capability is enabled (variant A).
    pub metadata_capture: bool,
    /// Submission timeout and cancellation scope for this session.
    pub submit: SubmitOptions,
}

impl SessionOptions {
    /// Variant A: clinical metadata capture enabled.
    pub fn clinical(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            metadata_capture: true,
            submit: SubmitOptions::default(),
        }
    }

    /// Variant B: image-only submission, no clinical form.
    pub fn image_only(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            metadata_capture: false,
            submit: SubmitOptions::default(),
        }
    }

    /// Replaces the submission options.
    pub fn with_submit_options(mut self, submit: SubmitOptions) -> Self {
        self.submit = submit;
        self
    }
}

/// Owns the full submission workflow for one in-memory session.
pub struct SessionController {
    metadata_capture: bool,
    capture: CaptureSurface,
    metadata: LesionMetadata,
    machine: SubmissionMachine,
    client: SubmitClient,
    last_fingerprint: Option<String>,
}

impl SessionController {
    /// Creates a session in `Idle` state.
    ///
    /// # Errors
    /// Returns [`AppError::Submit`] when the configured endpoint violates the
    /// wire contract.
    pub fn new(
        options: SessionOptions,
        transport: Arc<dyn SubmitTransport>,
    ) -> Result<Self, AppError> {
        let client = SubmitClient::new(options.endpoint, transport)?.with_options(options.submit);

        Ok(Self {
            metadata_capture: options.metadata_capture,
            capture: CaptureSurface::new(),
            metadata: LesionMetadata::new(),
            machine: SubmissionMachine::new(),
            client,
            last_fingerprint: None,
        })
    }

    /// Offers a dropped file to the session.
    ///
    /// Acceptance invalidates the previous analysis: the stale result and
    /// error are cleared alongside the workflow transition.
    pub fn offer_file(&mut self, file: SelectedFile) -> CaptureOutcome {
        let outcome = self.capture.offer(file);
        if outcome.is_accepted() {
            self.machine.on_image_selected();
        }
        outcome
    }

    /// Routes a file-picker invocation through the given source.
    ///
    /// # Errors
    /// Returns [`AppError::Capture`] when the dialog backend fails.
    pub fn request_from_picker(
        &mut self,
        source: &dyn ImageSource,
    ) -> Result<CaptureOutcome, AppError> {
        let outcome = self.capture.request_from_picker(source)?;
        if outcome.is_accepted() {
            self.machine.on_image_selected();
        }
        Ok(outcome)
    }

    /// Clears the current image and its preview; metadata is untouched.
    pub fn change_image(&mut self) {
        if self.capture.change_image() {
            self.machine.on_image_cleared();
        }
    }

    /// Sets the free-text patient identifier (clinical capability only).
    pub fn set_patient_id(&mut self, patient_id: impl Into<String>) {
        if self.metadata_capture {
            self.metadata.set_patient_id(patient_id);
        }
    }

    /// Sets or clears the ground-truth diagnosis (clinical capability only).
    pub fn set_diagnosis(&mut self, diagnosis: Option<Diagnosis>) {
        if self.metadata_capture {
            self.metadata.set_diagnosis(diagnosis);
        }
    }

    /// Sets the free-text lesion location (clinical capability only).
    pub fn set_lesion_location(&mut self, lesion_location: impl Into<String>) {
        if self.metadata_capture {
            self.metadata.set_lesion_location(lesion_location);
        }
    }

    /// Returns the clinical metadata when the capability is enabled.
    pub fn metadata(&self) -> Option<&LesionMetadata> {
        self.metadata_capture.then_some(&self.metadata)
    }

    /// Runs one submission attempt and returns the resulting state.
    ///
    /// Gate order:
    /// 1. An outstanding request makes this a no-op (the submit affordance is
    ///    disabled while `Submitting`).
    /// 2. Missing image short-circuits locally with
    ///    [`MISSING_IMAGE_MESSAGE`]; no network activity.
    /// 3. With the clinical capability on, a missing diagnosis
    ///    short-circuits locally with [`MISSING_DIAGNOSIS_MESSAGE`].
    /// 4. Otherwise exactly one request is issued and resolves into
    ///    `Success` or `Failure`.
    pub fn submit(&mut self) -> WorkflowState {
        if self.machine.is_submitting() {
            return self.machine.state();
        }

        let Some(image) = self.capture.image() else {
            self.machine.fail_validation(MISSING_IMAGE_MESSAGE);
            return self.machine.state();
        };

        if self.metadata_capture && !self.metadata.has_diagnosis() {
            self.machine.fail_validation(MISSING_DIAGNOSIS_MESSAGE);
            return self.machine.state();
        }

        let envelope = build_envelope(image, self.metadata_capture.then_some(&self.metadata));
        if self.machine.begin_submission().is_err() {
            return self.machine.state();
        }
        self.last_fingerprint = Some(submission_fingerprint(&envelope));

        match self.client.submit(&envelope) {
            Ok(response) => match interpret_response(&response) {
                Ok(result) => self.machine.complete_success(result),
                Err(failure) => self.machine.complete_failure(failure.message),
            },
            Err(error) => self
                .machine
                .complete_failure(failure_from_transport(&error).message),
        }

        self.machine.state()
    }

    /// Returns the session to its exact initial state.
    ///
    /// Clears the image, preview, result, error, and (when the clinical
    /// capability is on) all metadata fields.
    pub fn reset(&mut self) {
        self.capture.change_image();
        self.metadata.clear();
        self.machine.reset();
        self.last_fingerprint = None;
    }

    /// Returns the current workflow state.
    pub fn workflow_state(&self) -> WorkflowState {
        self.machine.state()
    }

    /// Returns `true` when the submit affordance should be enabled.
    pub fn can_submit(&self) -> bool {
        self.machine.can_submit(self.capture.has_image())
    }

    /// Returns the preview URI for the accepted image, if any.
    pub fn preview_uri(&self) -> Option<&str> {
        self.capture.preview_uri()
    }

    /// Returns the raw prediction result while in `Success`.
    pub fn result(&self) -> Option<&PredictionResponse> {
        self.machine.result()
    }

    /// Returns the derived result presentation after a success.
    pub fn result_view(&self) -> Option<ResultView> {
        self.machine.result().map(present_result)
    }

    /// Returns the failure message after a failed attempt.
    pub fn error_message(&self) -> Option<&str> {
        self.machine.error_message()
    }

    /// Returns the fingerprint of the most recently issued submission.
    pub fn last_fingerprint(&self) -> Option<&str> {
        self.last_fingerprint.as_deref()
    }

    /// Pointer entered the drop target while dragging.
    pub fn on_drag_enter(&mut self) {
        self.capture.on_drag_enter();
    }

    /// Pointer is moving over the drop target while dragging.
    pub fn on_drag_over(&mut self) {
        self.capture.on_drag_over();
    }

    /// Pointer left the drop target.
    pub fn on_drag_leave(&mut self) {
        self.capture.on_drag_leave();
    }

    /// Returns `true` while a drag is hovering the drop target.
    pub fn is_drag_active(&self) -> bool {
        self.capture.is_drag_active()
    }
}

/// Consolidated session snapshot for simple shell projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    /// Workflow state as a human-readable string.
    pub workflow: String,
    /// Whether the submit affordance is enabled.
    pub can_submit: bool,
    /// Preview URI for the accepted image.
    pub preview_uri: Option<String>,
    /// Predicted class of the last successful result.
    pub predicted_class: Option<String>,
    /// Confidence literal of the last successful result.
    pub confidence: Option<String>,
    /// Accent color for the derived risk tier.
    pub risk_accent: Option<String>,
    /// Failure message of the last failed attempt.
    pub error: Option<String>,
    /// Fingerprint of the most recently issued submission.
    pub fingerprint: Option<String>,
}

/// Projects the session into a flat status snapshot.
pub fn project_session_status(controller: &SessionController) -> SessionStatus {
    let result_view = controller.result_view();

    SessionStatus {
        workflow: format!("{:?}", controller.workflow_state()),
        can_submit: controller.can_submit(),
        preview_uri: controller.preview_uri().map(str::to_string),
        predicted_class: result_view
            .as_ref()
            .map(|view| view.predicted_class.clone()),
        confidence: result_view
            .as_ref()
            .map(|view| view.confidence_display.clone()),
        risk_accent: result_view
            .as_ref()
            .map(|view| view.tier.accent().to_string()),
        error: controller.error_message().map(str::to_string),
        fingerprint: controller.last_fingerprint().map(str::to_string),
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Capture subsystem error.
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),
    /// Submission subsystem error.
    #[error("submit error: {0}")]
    Submit(#[from] SubmitError),
}
