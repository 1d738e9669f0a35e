#![warn(missing_docs)]
//! # lesion-scan-core
//!
//! ## Purpose
//! Defines the pure data model used across the `lesion-scan` workspace.
//!
//! ## Responsibilities
//! - Represent one captured dermoscopic image with its declared content type.
//! - Model the closed clinical diagnosis category set.
//! - Hold the optional clinical metadata attached to a submission.
//!
//! ## Data flow
//! Capture code produces [`CapturedImage`] values; the clinical form mutates
//! [`LesionMetadata`]; both feed submission envelope assembly downstream.
//!
//! ## Ownership and lifetimes
//! Images own their backing byte buffers (`Vec<u8>`) so the submission layer
//! can hold them across the network call without borrowing from capture
//! internals.
//!
//! ## Error model
//! Validation failures (empty image buffer, blank content type) return
//! [`CoreError`] variants with caller-actionable categorization.
//!
//! ## Security and privacy notes
//! Patient identifiers are treated as opaque free text and are never
//! transformed or logged by this crate.
//!
//! ## Example
//! ```rust
//! use lesion_scan_core::{CapturedImage, Diagnosis, LesionMetadata};
//!
//! let image = CapturedImage::new("lesion.png", "image/png", vec![1, 2, 3]).unwrap();
//! assert_eq!(image.content_type, "image/png");
//!
//! let mut metadata = LesionMetadata::new();
//! metadata.set_diagnosis(Some(Diagnosis::Melanoma));
//! assert!(metadata.has_diagnosis());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of selectable clinical diagnosis categories.
pub const DIAGNOSIS_CATEGORY_COUNT: usize = 11;

/// Closed set of clinical ground-truth diagnosis categories.
///
/// Ten named lesion categories plus one sentinel for images that cannot be
/// assessed. The serialized form is the exact clinical label shown to the
/// user and sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    /// Melanoma.
    Melanoma,
    /// Melanocytic nevus.
    #[serde(rename = "Melanocytic Nevus")]
    MelanocyticNevus,
    /// Basal cell carcinoma.
    #[serde(rename = "Basal Cell Carcinoma")]
    BasalCellCarcinoma,
    /// Actinic keratosis.
    #[serde(rename = "Actinic Keratosis")]
    ActinicKeratosis,
    /// Benign keratosis.
    #[serde(rename = "Benign Keratosis")]
    BenignKeratosis,
    /// Dermatofibroma.
    Dermatofibroma,
    /// Vascular lesion.
    #[serde(rename = "Vascular Lesion")]
    VascularLesion,
    /// Squamous cell carcinoma.
    #[serde(rename = "Squamous Cell Carcinoma")]
    SquamousCellCarcinoma,
    /// Benign lesion outside the named categories.
    #[serde(rename = "Benign Other")]
    BenignOther,
    /// Malignant lesion outside the named categories.
    #[serde(rename = "Malignant Other")]
    MalignantOther,
    /// Image cannot be assessed (not applicable or too small).
    #[serde(rename = "Image is not applicable / Too small")]
    NotApplicable,
}

impl Diagnosis {
    /// All selectable categories in display order.
    pub const ALL: [Diagnosis; DIAGNOSIS_CATEGORY_COUNT] = [
        Diagnosis::Melanoma,
        Diagnosis::MelanocyticNevus,
        Diagnosis::BasalCellCarcinoma,
        Diagnosis::ActinicKeratosis,
        Diagnosis::BenignKeratosis,
        Diagnosis::Dermatofibroma,
        Diagnosis::VascularLesion,
        Diagnosis::SquamousCellCarcinoma,
        Diagnosis::BenignOther,
        Diagnosis::MalignantOther,
        Diagnosis::NotApplicable,
    ];

    /// Returns the clinical label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Diagnosis::Melanoma => "Melanoma",
            Diagnosis::MelanocyticNevus => "Melanocytic Nevus",
            Diagnosis::BasalCellCarcinoma => "Basal Cell Carcinoma",
            Diagnosis::ActinicKeratosis => "Actinic Keratosis",
            Diagnosis::BenignKeratosis => "Benign Keratosis",
            Diagnosis::Dermatofibroma => "Dermatofibroma",
            Diagnosis::VascularLesion => "Vascular Lesion",
            Diagnosis::SquamousCellCarcinoma => "Squamous Cell Carcinoma",
            Diagnosis::BenignOther => "Benign Other",
            Diagnosis::MalignantOther => "Malignant Other",
            Diagnosis::NotApplicable => "Image is not applicable / Too small",
        }
    }

    /// Resolves a clinical label back to its category.
    pub fn from_label(label: &str) -> Option<Diagnosis> {
        Diagnosis::ALL
            .iter()
            .copied()
            .find(|diagnosis| diagnosis.label() == label)
    }
}

/// Optional clinical context captured alongside one submission.
///
/// Pure data capture: setters assign immediately, there is no derived state
/// and no field-level validation beyond the diagnosis being present at
/// submission time (checked by the workflow, not here).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LesionMetadata {
    /// Free-text patient identifier (optional).
    pub patient_id: String,
    /// Ground-truth diagnosis; required before submission.
    pub diagnosis: Option<Diagnosis>,
    /// Free-text anatomical location of the lesion (optional).
    pub lesion_location: String,
}

impl LesionMetadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the patient identifier.
    pub fn set_patient_id(&mut self, patient_id: impl Into<String>) {
        self.patient_id = patient_id.into();
    }

    /// Sets or clears the ground-truth diagnosis.
    pub fn set_diagnosis(&mut self, diagnosis: Option<Diagnosis>) {
        self.diagnosis = diagnosis;
    }

    /// Sets the lesion location.
    pub fn set_lesion_location(&mut self, lesion_location: impl Into<String>) {
        self.lesion_location = lesion_location.into();
    }

    /// Returns `true` when a diagnosis has been selected.
    pub fn has_diagnosis(&self) -> bool {
        self.diagnosis.is_some()
    }

    /// Clears all fields back to their initial state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One captured dermoscopic image held for the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// File name reported by the providing channel.
    pub file_name: String,
    /// Declared MIME content type (for example `image/png`).
    pub content_type: String,
    /// Raw image bytes; owned exclusively by the session.
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    /// Constructs a validated captured image.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyImageData`] when the byte buffer is empty.
    /// Returns [`CoreError::BlankContentType`] when the declared content type
    /// is blank.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let content_type = content_type.into();
        if content_type.trim().is_empty() {
            return Err(CoreError::BlankContentType);
        }
        if bytes.is_empty() {
            return Err(CoreError::EmptyImageData);
        }

        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Returns the image size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when the byte buffer is empty.
    ///
    /// The validated constructor makes this unreachable for well-formed
    /// values; it exists for the conventional `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Error type for core domain validation failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Image byte buffer cannot be empty.
    #[error("image data is empty")]
    EmptyImageData,
    /// Declared content type cannot be blank.
    #[error("image content type is blank")]
    BlankContentType,
}
