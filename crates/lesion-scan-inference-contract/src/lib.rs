#![warn(missing_docs)]
//! # lesion-scan-inference-contract
//!
//! ## Purpose
//! Defines the inference endpoint wire contract and client-side parsing
//! helpers.
//!
//! ## Responsibilities
//! - Name the multipart request fields and the required endpoint path.
//! - Parse prediction response payloads.
//! - Interpret the pre-formatted confidence literal for bar rendering.
//!
//! ## Data flow
//! Raw JSON response -> [`parse_prediction_response`] ->
//! [`confidence_fill_fraction`] -> result presentation.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs to avoid borrowing from transient network
//! buffers.
//!
//! ## Error model
//! Invalid JSON, blank mandatory fields, and malformed confidence literals
//! return [`ContractError`].
//!
//! ## Security and privacy notes
//! This crate processes only model outputs; it never sees image bytes or
//! patient identifiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Required path suffix for the prediction endpoint.
pub const REQUIRED_PREDICT_PATH: &str = "/predict";

/// Multipart field carrying the raw image bytes.
pub const FIELD_FILE: &str = "file";
/// Multipart field carrying the free-text patient identifier.
pub const FIELD_PATIENT_ID: &str = "patient_id";
/// Multipart field carrying the ground-truth diagnosis label.
pub const FIELD_DIAGNOSIS: &str = "diagnosis";
/// Multipart field carrying the free-text lesion location.
pub const FIELD_LESION_LOCATION: &str = "lesion_location";

/// Parsed prediction response from the inference endpoint.
///
/// `confidence` is an opaque, pre-formatted percentage literal (for example
/// `"87.25%"`) and is surfaced verbatim. Unknown response fields (such as the
/// raw model probability some deployments attach) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Predicted class label.
    #[serde(rename = "class")]
    pub predicted_class: String,
    /// Pre-formatted confidence percentage literal.
    pub confidence: String,
}

/// Parses raw JSON into a validated prediction response.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON.
/// Returns [`ContractError::InvalidContract`] when mandatory fields are
/// blank.
pub fn parse_prediction_response(raw: &str) -> Result<PredictionResponse, ContractError> {
    let parsed: PredictionResponse = serde_json::from_str(raw).map_err(ContractError::Decode)?;

    if parsed.predicted_class.trim().is_empty() {
        return Err(ContractError::InvalidContract(
            "class is empty".to_string(),
        ));
    }

    if parsed.confidence.trim().is_empty() {
        return Err(ContractError::InvalidContract(
            "confidence is empty".to_string(),
        ));
    }

    Ok(parsed)
}

/// Interprets the confidence literal as a CSS-style percentage width.
///
/// # Returns
/// The bar fill fraction in `[0.0, 1.0]`; values above `100%` clamp to full.
///
/// # Errors
/// Returns [`ContractError::InvalidConfidence`] when the literal has no `%`
/// suffix or the numeric part is not a non-negative finite number.
pub fn confidence_fill_fraction(display: &str) -> Result<f32, ContractError> {
    let trimmed = display.trim();
    let number = trimmed
        .strip_suffix('%')
        .ok_or_else(|| ContractError::InvalidConfidence(display.to_string()))?;

    let percent: f32 = number
        .trim()
        .parse()
        .map_err(|_| ContractError::InvalidConfidence(display.to_string()))?;

    if !percent.is_finite() || percent < 0.0 {
        return Err(ContractError::InvalidConfidence(display.to_string()));
    }

    Ok((percent / 100.0).clamp(0.0, 1.0))
}

/// Inference contract errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decode failure.
    #[error("prediction decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("prediction contract violation: {0}")]
    InvalidContract(String),
    /// Confidence literal is not a renderable percentage.
    #[error("confidence literal is not a percentage: {0}")]
    InvalidConfidence(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for response parsing and confidence interpretation.

    use super::*;

    #[test]
    fn parses_response_and_ignores_extra_fields() {
        let raw = r#"{"class":"Melanocytic (Risk)","confidence":"87.25%","raw_probability":0.8725}"#;
        let parsed = parse_prediction_response(raw).expect("response should parse");
        assert_eq!(parsed.predicted_class, "Melanocytic (Risk)");
        assert_eq!(parsed.confidence, "87.25%");
    }

    #[test]
    fn rejects_blank_class() {
        let raw = r#"{"class":"  ","confidence":"90%"}"#;
        assert!(matches!(
            parse_prediction_response(raw),
            Err(ContractError::InvalidContract(_))
        ));
    }

    #[test]
    fn confidence_literal_maps_to_bar_fill() {
        let fraction = confidence_fill_fraction("92%").expect("literal should parse");
        assert!((fraction - 0.92).abs() < f32::EPSILON);

        let clamped = confidence_fill_fraction("150%").expect("literal should parse");
        assert!((clamped - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_confidence_literal_is_an_error() {
        assert!(confidence_fill_fraction("ninety").is_err());
        assert!(confidence_fill_fraction("92").is_err());
        assert!(confidence_fill_fraction("-5%").is_err());
    }
}
