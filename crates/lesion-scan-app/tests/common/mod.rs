//! Shared fixtures for app integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use lesion_scan_app::{SessionController, SessionOptions};
use lesion_scan_capture::SelectedFile;
use lesion_scan_submit::{
    SubmissionEnvelope, SubmitError, SubmitOptions, SubmitTransport, TransportResponse,
};

/// Endpoint used by all controller fixtures.
#[allow(dead_code)]
pub const TEST_ENDPOINT: &str = "http://localhost:8000/predict";

/// One scripted transport behavior.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Script {
    /// Deliver a response with the given status and body.
    Respond(u16, String),
    /// Fail with a transport-level description.
    FailTransport(String),
    /// Fail with the bounded-wait timeout.
    FailTimeout,
}

/// Transport that replays a scripted behavior sequence and records traffic.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Script>>,
    calls: Mutex<u32>,
    envelopes: Mutex<Vec<SubmissionEnvelope>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Creates a transport replaying the given steps in order.
    pub fn new(steps: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            calls: Mutex::new(0),
            envelopes: Mutex::new(Vec::new()),
        })
    }

    /// Creates a transport scripted with one successful prediction body.
    pub fn success(class: &str, confidence: &str) -> Arc<Self> {
        let body = serde_json::json!({ "class": class, "confidence": confidence });
        Self::new(vec![Script::Respond(200, body.to_string())])
    }

    /// Returns the number of requests that reached this transport.
    pub fn call_count(&self) -> u32 {
        *self.calls.lock().expect("call counter lock should work")
    }

    /// Returns the envelopes captured from issued requests.
    pub fn captured_envelopes(&self) -> Vec<SubmissionEnvelope> {
        self.envelopes
            .lock()
            .expect("envelope lock should work")
            .clone()
    }
}

impl SubmitTransport for ScriptedTransport {
    fn send(
        &self,
        _endpoint: &str,
        envelope: &SubmissionEnvelope,
        _options: &SubmitOptions,
    ) -> Result<TransportResponse, SubmitError> {
        *self.calls.lock().expect("call counter lock should work") += 1;
        self.envelopes
            .lock()
            .expect("envelope lock should work")
            .push(envelope.clone());

        let step = self
            .steps
            .lock()
            .expect("script lock should work")
            .pop_front();
        match step {
            Some(Script::Respond(status, body)) => Ok(TransportResponse { status, body }),
            Some(Script::FailTransport(message)) => Err(SubmitError::Transport(message)),
            Some(Script::FailTimeout) => Err(SubmitError::TimedOut),
            None => Err(SubmitError::Transport("script exhausted".to_string())),
        }
    }
}

/// Creates a deterministic image offering.
#[allow(dead_code)]
pub fn fixture_image_file() -> SelectedFile {
    SelectedFile {
        file_name: "lesion.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

/// Creates a variant-A controller (clinical metadata capture on).
#[allow(dead_code)]
pub fn clinical_controller(transport: Arc<ScriptedTransport>) -> SessionController {
    SessionController::new(SessionOptions::clinical(TEST_ENDPOINT), transport)
        .expect("clinical controller should build")
}

/// Creates a variant-B controller (image-only submission).
#[allow(dead_code)]
pub fn image_only_controller(transport: Arc<ScriptedTransport>) -> SessionController {
    SessionController::new(SessionOptions::image_only(TEST_ENDPOINT), transport)
        .expect("image-only controller should build")
}
