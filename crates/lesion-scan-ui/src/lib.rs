#![warn(missing_docs)]
//! # lesion-scan-ui
//!
//! ## Purpose
//! Derives the display-safe risk presentation from a prediction result.
//!
//! ## Responsibilities
//! - Map predicted class labels to a risk tier through an explicit closed
//!   lookup, with the legacy substring rule only as a fallback.
//! - Project the tier into accent color, iconography, and advisory copy.
//! - Compute the confidence bar fill from the pre-formatted literal.
//!
//! ## Data flow
//! [`lesion_scan_inference_contract::PredictionResponse`] ->
//! [`present_result`] -> [`ResultView`] consumed by rendering shells.
//!
//! ## Ownership and lifetimes
//! Views own their string values so shells can hold them across re-renders
//! without borrowing from workflow state.
//!
//! ## Error model
//! This crate favors total functions over recoverable errors: every
//! prediction result produces a view. A malformed confidence literal renders
//! as zero bar fill, the same way an invalid CSS width collapses.

use lesion_scan_inference_contract::{PredictionResponse, confidence_fill_fraction};

/// Class labels that map to the high-risk melanocytic tier.
///
/// The first two are the labels the deployed binary classifier emits; the
/// named lesion categories of the melanocytic group are listed alongside so a
/// per-category model upgrade keeps classifying correctly.
pub const MELANOCYTIC_CLASS_LABELS: [&str; 4] = [
    "Melanocytic (Risk)",
    "Melanocytic (High Risk)",
    "Melanoma",
    "Melanocytic Nevus",
];

/// Cautionary copy shown for high-risk results.
pub const HIGH_RISK_ADVISORY: &str = "The model has detected features highly consistent with \
     melanocytic lesions. It is recommended to proceed with standard diagnostic protocols for \
     high-risk lesions.";

/// Softer advisory copy shown for lower-risk results.
pub const LOWER_RISK_ADVISORY: &str = "The model analysis suggests a lower probability of \
     melanocytic features. However, clinical correlation remains essential.";

/// Risk categorization of a predicted class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    /// Melanocytic group; warning presentation and consult-now copy.
    HighRisk,
    /// Everything else; reassuring presentation.
    LowerRisk,
}

impl RiskTier {
    /// Returns `true` for the high-risk tier.
    pub fn is_high_risk(&self) -> bool {
        matches!(self, RiskTier::HighRisk)
    }

    /// Accent color name used by rendering shells.
    pub fn accent(&self) -> &'static str {
        match self {
            RiskTier::HighRisk => "red",
            RiskTier::LowerRisk => "teal",
        }
    }

    /// Icon name used by rendering shells.
    pub fn icon(&self) -> &'static str {
        match self {
            RiskTier::HighRisk => "alert-triangle",
            RiskTier::LowerRisk => "check-circle",
        }
    }

    /// Advisory copy rendered under the result.
    pub fn advisory(&self) -> &'static str {
        match self {
            RiskTier::HighRisk => HIGH_RISK_ADVISORY,
            RiskTier::LowerRisk => LOWER_RISK_ADVISORY,
        }
    }
}

/// Categorizes a predicted class label.
///
/// Known melanocytic labels match through the closed lookup table; labels the
/// table has never seen fall back to the substring rule so a renamed
/// melanocytic label still lands in the cautious tier.
pub fn classify_risk(predicted_class: &str) -> RiskTier {
    if MELANOCYTIC_CLASS_LABELS.contains(&predicted_class) {
        return RiskTier::HighRisk;
    }

    if predicted_class.contains("Melanocytic") {
        return RiskTier::HighRisk;
    }

    RiskTier::LowerRisk
}

/// Display-ready projection of one prediction result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// Predicted class label, verbatim from the response.
    pub predicted_class: String,
    /// Confidence literal, verbatim from the response.
    pub confidence_display: String,
    /// Derived risk tier.
    pub tier: RiskTier,
    /// Confidence bar fill in `[0.0, 1.0]`.
    pub confidence_fill: f32,
}

/// Derives the result presentation, purely as a function of the response.
pub fn present_result(response: &PredictionResponse) -> ResultView {
    ResultView {
        predicted_class: response.predicted_class.clone(),
        confidence_display: response.confidence.clone(),
        tier: classify_risk(&response.predicted_class),
        confidence_fill: confidence_fill_fraction(&response.confidence).unwrap_or(0.0),
    }
}
