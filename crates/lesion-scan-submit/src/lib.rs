#![warn(missing_docs)]
//! # lesion-scan-submit
//!
//! ## Purpose
//! Orchestrates the asynchronous prediction submission: payload assembly,
//! the network request, response interpretation, and the workflow state
//! machine that gates it all.
//!
//! ## Responsibilities
//! - Assemble the outbound multipart envelope from image and metadata.
//! - Validate the prediction endpoint at client construction.
//! - Execute exactly one request per submission through an injectable
//!   transport abstraction, with a bounded wait and a cancellation token.
//! - Interpret responses into success results or categorized failures.
//! - Model the legal workflow state transitions.
//!
//! ## Data flow
//! Accepted image + clinical metadata -> [`build_envelope`] ->
//! [`SubmitClient::submit`] through [`SubmitTransport`] ->
//! [`interpret_response`] -> [`SubmissionMachine`] terminal state.
//!
//! ## Ownership and lifetimes
//! Envelopes own their byte buffers so a transport can hold them for the full
//! duration of a request without borrowing from session state.
//!
//! ## Error model
//! Endpoint policy violations and transport failures are [`SubmitError`]
//! values; resolved submissions that did not produce a result are categorized
//! [`SubmissionFailure`] values. There is no retry logic: every failure is
//! terminal for the current attempt and recoverable only by explicit
//! resubmission.
//!
//! ## Security and privacy notes
//! This crate never logs image bytes or patient identifiers. The submission
//! fingerprint is a one-way digest usable for traceability without exposing
//! payload content.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lesion_scan_core::{CapturedImage, LesionMetadata};
use lesion_scan_inference_contract::{
    ContractError, FIELD_DIAGNOSIS, FIELD_FILE, FIELD_LESION_LOCATION, FIELD_PATIENT_ID,
    PredictionResponse, REQUIRED_PREDICT_PATH, parse_prediction_response,
};
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

/// Default bounded wait for one prediction request.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Validation message shown when submit is invoked without an image.
pub const MISSING_IMAGE_MESSAGE: &str = "Please upload an image first.";

/// Validation message shown when submit is invoked without a diagnosis.
pub const MISSING_DIAGNOSIS_MESSAGE: &str =
    "Please select a clinical diagnosis (ground truth).";

/// Fixed message for any non-success response status.
pub const SERVER_FAILURE_MESSAGE: &str = "Prediction failed. Please check server connection.";

/// Phase of the submission workflow state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No image has been captured.
    Idle,
    /// An image is captured and ready to submit.
    FileSelected,
    /// Exactly one prediction request is outstanding.
    Submitting,
    /// The last submission produced a prediction result.
    Success,
    /// The last submission (or its local validation) failed.
    Failure,
}

/// Workflow state machine with explicit legal transitions.
///
/// Holds the terminal-state payloads (`result` xor `error`) so the mutual
/// exclusion invariant is enforced in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionMachine {
    state: WorkflowState,
    result: Option<PredictionResponse>,
    error_message: Option<String>,
}

impl SubmissionMachine {
    /// Creates a machine in `Idle` state.
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            result: None,
            error_message: None,
        }
    }

    /// Returns the current workflow state.
    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Returns the last successful result, if the machine is in `Success`.
    pub fn result(&self) -> Option<&PredictionResponse> {
        self.result.as_ref()
    }

    /// Returns the failure message, if the machine is in `Failure`.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns `true` while a request is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.state == WorkflowState::Submitting
    }

    /// Returns `true` when the submit affordance should be enabled.
    pub fn can_submit(&self, has_image: bool) -> bool {
        has_image && !self.is_submitting()
    }

    /// Applies a successful image capture.
    ///
    /// A prior terminal state is invalidated: the stale result and error are
    /// cleared. An outstanding request is never interrupted, so the state
    /// stays `Submitting` until that request resolves; otherwise it becomes
    /// `FileSelected`.
    pub fn on_image_selected(&mut self) {
        self.result = None;
        self.error_message = None;
        if self.state != WorkflowState::Submitting {
            self.state = WorkflowState::FileSelected;
        }
    }

    /// Applies an image removal (change-image affordance).
    ///
    /// Clears the stale result; outside of an outstanding request the machine
    /// returns to `Idle` (and drops any failure message with it, since a
    /// failure message may only exist in `Failure`).
    pub fn on_image_cleared(&mut self) {
        self.result = None;
        if self.state != WorkflowState::Submitting {
            self.state = WorkflowState::Idle;
            self.error_message = None;
        }
    }

    /// Records a synchronous local validation failure.
    ///
    /// No network activity is associated with this transition.
    pub fn fail_validation(&mut self, message: impl Into<String>) {
        self.state = WorkflowState::Failure;
        self.result = None;
        self.error_message = Some(message.into());
    }

    /// Begins a submission attempt.
    ///
    /// # Errors
    /// Returns [`SubmitError::AlreadyInFlight`] when a request is already
    /// outstanding; at most one request may be in flight.
    pub fn begin_submission(&mut self) -> Result<(), SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::AlreadyInFlight);
        }

        self.state = WorkflowState::Submitting;
        self.error_message = None;
        Ok(())
    }

    /// Resolves the outstanding request with a prediction result.
    pub fn complete_success(&mut self, result: PredictionResponse) {
        self.state = WorkflowState::Success;
        self.result = Some(result);
        self.error_message = None;
    }

    /// Resolves the outstanding request (or a local validation) with a
    /// user-facing failure message.
    pub fn complete_failure(&mut self, message: impl Into<String>) {
        self.state = WorkflowState::Failure;
        self.result = None;
        self.error_message = Some(message.into());
    }

    /// Returns the machine to its initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SubmissionMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Cooperative cancellation token for a submission attempt.
///
/// Checked at dispatch time: a cancelled token prevents the request from
/// being issued. An already issued request runs to completion and cannot be
/// aborted mid-flight.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` when the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Per-session submission options.
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    /// Bounded wait for one request.
    pub timeout: Duration,
    /// Dispatch-time cancellation token.
    pub cancel: CancelToken,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SUBMIT_TIMEOUT,
            cancel: CancelToken::new(),
        }
    }
}

/// Assembled outbound multipart payload for one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEnvelope {
    /// File name for the image part.
    pub file_name: String,
    /// Declared MIME type for the image part.
    pub content_type: String,
    /// Raw image bytes.
    pub image_bytes: Vec<u8>,
    /// Accompanying text fields in wire order.
    pub fields: Vec<(String, String)>,
}

/// Builds the outbound envelope from the accepted image and, when clinical
/// metadata capture is enabled, the accompanying text fields.
///
/// Field order matches the wire contract: `patient_id`, `diagnosis`,
/// `lesion_location`. Optional free-text fields are sent even when empty;
/// with `metadata` absent no text fields are attached at all.
pub fn build_envelope(
    image: &CapturedImage,
    metadata: Option<&LesionMetadata>,
) -> SubmissionEnvelope {
    let mut fields = Vec::new();
    if let Some(metadata) = metadata {
        fields.push((FIELD_PATIENT_ID.to_string(), metadata.patient_id.clone()));
        fields.push((
            FIELD_DIAGNOSIS.to_string(),
            metadata
                .diagnosis
                .map(|diagnosis| diagnosis.label().to_string())
                .unwrap_or_default(),
        ));
        fields.push((
            FIELD_LESION_LOCATION.to_string(),
            metadata.lesion_location.clone(),
        ));
    }

    SubmissionEnvelope {
        file_name: image.file_name.clone(),
        content_type: image.content_type.clone(),
        image_bytes: image.bytes.clone(),
        fields,
    }
}

/// Computes a stable hex digest identifying one envelope.
///
/// Identical image bytes and fields produce identical fingerprints, so the
/// digest can tag log lines and stored artifacts without exposing payload
/// content.
pub fn submission_fingerprint(envelope: &SubmissionEnvelope) -> String {
    let mut hasher = Sha256::new();
    hasher.update(envelope.content_type.as_bytes());
    hasher.update([0_u8]);
    hasher.update(&envelope.image_bytes);
    for (name, value) in &envelope.fields {
        hasher.update([0_u8]);
        hasher.update(name.as_bytes());
        hasher.update([0_u8]);
        hasher.update(value.as_bytes());
    }

    hex::encode(hasher.finalize())
}

/// Raw response delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl TransportResponse {
    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Abstract transport used by the submit client.
pub trait SubmitTransport: Send + Sync {
    /// Sends one assembled envelope to the prediction endpoint.
    ///
    /// # Errors
    /// Returns [`SubmitError`] when the request could not be completed.
    fn send(
        &self,
        endpoint: &str,
        envelope: &SubmissionEnvelope,
        options: &SubmitOptions,
    ) -> Result<TransportResponse, SubmitError>;
}

/// Submit client that validates endpoint policy and executes one attempt.
#[derive(Clone)]
pub struct SubmitClient {
    endpoint: String,
    transport: Arc<dyn SubmitTransport>,
    options: SubmitOptions,
}

impl SubmitClient {
    /// Creates a validated submit client with default options.
    ///
    /// # Errors
    /// Returns [`SubmitError::InvalidEndpoint`] when the URL is not http(s)
    /// or does not end with the required `/predict` path.
    pub fn new(
        endpoint: impl Into<String>,
        transport: Arc<dyn SubmitTransport>,
    ) -> Result<Self, SubmitError> {
        let endpoint = endpoint.into();
        validate_predict_endpoint(&endpoint)?;
        Ok(Self {
            endpoint,
            transport,
            options: SubmitOptions::default(),
        })
    }

    /// Replaces the session submission options.
    pub fn with_options(mut self, options: SubmitOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the configured prediction endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the session submission options.
    pub fn options(&self) -> &SubmitOptions {
        &self.options
    }

    /// Executes exactly one request for the given envelope.
    ///
    /// No retries: a failed attempt is surfaced once and requires explicit
    /// user-initiated resubmission.
    ///
    /// # Errors
    /// Returns [`SubmitError::Cancelled`] when the token was cancelled before
    /// dispatch; transport failures propagate as-is.
    pub fn submit(&self, envelope: &SubmissionEnvelope) -> Result<TransportResponse, SubmitError> {
        if self.options.cancel.is_cancelled() {
            return Err(SubmitError::Cancelled);
        }

        self.transport.send(&self.endpoint, envelope, &self.options)
    }
}

/// Validates prediction endpoint constraints.
///
/// # Errors
/// Returns [`SubmitError::InvalidEndpoint`] for a non-http(s) scheme or a
/// path that does not end with `/predict`.
pub fn validate_predict_endpoint(endpoint: &str) -> Result<(), SubmitError> {
    let parsed = Url::parse(endpoint)
        .map_err(|error| SubmitError::InvalidEndpoint(format!("invalid url: {error}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(SubmitError::InvalidEndpoint(
            "prediction endpoint must use http or https".to_string(),
        ));
    }

    if !parsed.path().ends_with(REQUIRED_PREDICT_PATH) {
        return Err(SubmitError::InvalidEndpoint(format!(
            "prediction endpoint path must end with {REQUIRED_PREDICT_PATH}"
        )));
    }

    Ok(())
}

/// Category of a resolved submission failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Local validation short-circuit; no network activity occurred.
    Validation,
    /// The request could not be completed (connectivity, timeout, cancel).
    Transport,
    /// The endpoint answered with a non-success status.
    Server,
    /// The endpoint answered success with an undecodable body.
    MalformedResponse,
}

/// User-facing failure produced by a resolved submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Message rendered in the error banner.
    pub message: String,
}

impl SubmissionFailure {
    /// Creates a local validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Validation,
            message: message.into(),
        }
    }
}

/// Interprets a delivered response into a result or a categorized failure.
///
/// A non-success status maps to the fixed [`SERVER_FAILURE_MESSAGE`]
/// regardless of its body; a success status with an undecodable body carries
/// the decode failure's description.
pub fn interpret_response(
    response: &TransportResponse,
) -> Result<PredictionResponse, SubmissionFailure> {
    if !response.is_success() {
        return Err(SubmissionFailure {
            kind: FailureKind::Server,
            message: SERVER_FAILURE_MESSAGE.to_string(),
        });
    }

    parse_prediction_response(&response.body).map_err(|error: ContractError| SubmissionFailure {
        kind: FailureKind::MalformedResponse,
        message: error.to_string(),
    })
}

/// Maps a transport-level error to its user-facing failure.
pub fn failure_from_transport(error: &SubmitError) -> SubmissionFailure {
    SubmissionFailure {
        kind: FailureKind::Transport,
        message: error.to_string(),
    }
}

/// Errors produced by the submit client and transports.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Endpoint violates the wire contract requirements.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// A request is already outstanding for this session.
    #[error("a submission is already in flight")]
    AlreadyInFlight,
    /// The request could not reach the endpoint.
    #[error("prediction transport failure: {0}")]
    Transport(String),
    /// The bounded wait elapsed before a response arrived.
    #[error("prediction request timed out")]
    TimedOut,
    /// The cancellation token was set before dispatch.
    #[error("submission cancelled before dispatch")]
    Cancelled,
}

/// Blocking HTTP transport implementing the multipart wire contract.
pub struct HttpSubmitTransport {
    client: reqwest::blocking::Client,
}

impl HttpSubmitTransport {
    /// Creates a transport with a shared connection pool.
    ///
    /// # Errors
    /// Returns [`SubmitError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new() -> Result<Self, SubmitError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|error| SubmitError::Transport(error.to_string()))?;
        Ok(Self { client })
    }
}

impl SubmitTransport for HttpSubmitTransport {
    fn send(
        &self,
        endpoint: &str,
        envelope: &SubmissionEnvelope,
        options: &SubmitOptions,
    ) -> Result<TransportResponse, SubmitError> {
        if options.cancel.is_cancelled() {
            return Err(SubmitError::Cancelled);
        }

        let image_part = reqwest::blocking::multipart::Part::bytes(envelope.image_bytes.clone())
            .file_name(envelope.file_name.clone())
            .mime_str(&envelope.content_type)
            .map_err(|error| SubmitError::Transport(error.to_string()))?;

        let mut form = reqwest::blocking::multipart::Form::new().part(FIELD_FILE, image_part);
        for (name, value) in &envelope.fields {
            form = form.text(name.clone(), value.clone());
        }

        let response = self
            .client
            .post(endpoint)
            .timeout(options.timeout)
            .multipart(form)
            .send()
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(map_reqwest_error)?;

        Ok(TransportResponse { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> SubmitError {
    if error.is_timeout() {
        SubmitError::TimedOut
    } else {
        SubmitError::Transport(error.to_string())
    }
}
