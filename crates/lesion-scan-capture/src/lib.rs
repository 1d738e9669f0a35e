#![warn(missing_docs)]
//! # lesion-scan-capture
//!
//! ## Purpose
//! Acquires exactly one dermoscopic image for the current session, from
//! either a drag-and-drop offering or a file-picker dialog.
//!
//! ## Responsibilities
//! - Define a backend-agnostic file selection capability trait.
//! - Enforce the permissive-ignore content-type policy (`image/` prefix).
//! - Manage session-scoped preview handles with explicit issue/revoke.
//! - Track the transient drag-hover flag used by shells for styling.
//!
//! ## Data flow
//! A shell delivers [`SelectedFile`] offerings (drop) or routes through an
//! [`ImageSource`] (picker) -> [`CaptureSurface`] validates and stores one
//! [`lesion_scan_core::CapturedImage`] plus its [`PreviewHandle`] -> the
//! submission workflow reads the accepted image.
//!
//! ## Ownership and lifetimes
//! The surface owns the accepted image and its preview handle; replacing or
//! clearing the image revokes the old preview so handles never accumulate
//! across repeated selections.
//!
//! ## Error model
//! Non-image offerings are ignored by design and reported through
//! [`CaptureOutcome`], not as errors. Only picker backend failures surface as
//! [`CaptureError`].
//!
//! ## Security and privacy notes
//! Image bytes are held in memory only; nothing is persisted by this crate.
//!
//! ## Example
//! ```rust
//! use lesion_scan_capture::{CaptureOutcome, CaptureSurface, SelectedFile};
//!
//! let mut surface = CaptureSurface::new();
//! let outcome = surface.offer(SelectedFile {
//!     file_name: "lesion.png".to_string(),
//!     content_type: "image/png".to_string(),
//!     bytes: vec![1, 2, 3],
//! });
//! assert_eq!(outcome, CaptureOutcome::Accepted);
//! assert!(surface.preview_uri().is_some());
//! ```

use std::collections::BTreeSet;

use lesion_scan_core::CapturedImage;
use thiserror::Error;

/// Content-type prefix accepted by the capture surface.
pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

/// One file offered through either capture channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name reported by the providing channel.
    pub file_name: String,
    /// Declared MIME content type.
    pub content_type: String,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Platform capability for invoking a file selection dialog.
///
/// Shells implement this against their native dialog; tests use deterministic
/// in-memory sources.
pub trait ImageSource: Send + Sync {
    /// Asks the user to select a file.
    ///
    /// # Returns
    /// `Ok(None)` when the dialog was dismissed without a selection.
    ///
    /// # Errors
    /// Returns [`CaptureError::Source`] when the dialog backend fails.
    fn request_file_selection(&self) -> Result<Option<SelectedFile>, CaptureError>;
}

/// Deterministic in-memory source for tests and headless shells.
#[derive(Debug, Clone, Default)]
pub struct StaticImageSource {
    file: Option<SelectedFile>,
}

impl StaticImageSource {
    /// Creates a source that always returns the given file.
    pub fn with_file(file: SelectedFile) -> Self {
        Self { file: Some(file) }
    }

    /// Creates a source that behaves like a dismissed dialog.
    pub fn dismissed() -> Self {
        Self { file: None }
    }
}

impl ImageSource for StaticImageSource {
    fn request_file_selection(&self) -> Result<Option<SelectedFile>, CaptureError> {
        Ok(self.file.clone())
    }
}

/// Result of offering a file to the capture surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The file was accepted and is now the session image.
    Accepted,
    /// The picker dialog was dismissed without a selection.
    NoSelection,
    /// The declared content type is not an image; the offering was ignored
    /// without mutating the session.
    IgnoredNonImage,
    /// The file had no bytes; the offering was ignored without mutating the
    /// session.
    IgnoredEmptyFile,
    /// The picker is suppressed while a preview exists; replacing the image
    /// requires the explicit change-image action.
    PickerSuppressed,
}

impl CaptureOutcome {
    /// Returns `true` when the offering became the session image.
    pub fn is_accepted(&self) -> bool {
        matches!(self, CaptureOutcome::Accepted)
    }
}

/// Session-local preview reference for an accepted image.
///
/// Handles are valid only while registered; revoking a handle invalidates its
/// URI for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    id: u64,
    uri: String,
}

impl PreviewHandle {
    /// Returns the renderable preview URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Issues and revokes session-scoped preview handles.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: u64,
    active: BTreeSet<u64>,
}

impl PreviewRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh preview handle.
    pub fn issue(&mut self) -> PreviewHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(id);
        PreviewHandle {
            id,
            uri: format!("preview://session/{id}"),
        }
    }

    /// Revokes a previously issued handle.
    ///
    /// # Returns
    /// `true` when the handle was active and is now released.
    pub fn revoke(&mut self, handle: &PreviewHandle) -> bool {
        self.active.remove(&handle.id)
    }

    /// Returns `true` when the handle is still active.
    pub fn is_active(&self, handle: &PreviewHandle) -> bool {
        self.active.contains(&handle.id)
    }

    /// Returns the number of currently active handles.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

/// Transient drag-hover flag.
///
/// Purely visual: shells use it for styling the drop target; it has no effect
/// on acceptance logic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    active: bool,
}

impl DragState {
    /// Pointer entered the drop target while dragging.
    pub fn on_drag_enter(&mut self) {
        self.active = true;
    }

    /// Pointer is moving over the drop target while dragging.
    pub fn on_drag_over(&mut self) {
        self.active = true;
    }

    /// Pointer left the drop target.
    pub fn on_drag_leave(&mut self) {
        self.active = false;
    }

    /// A drop completed; the hover styling ends regardless of acceptance.
    pub fn on_drop(&mut self) {
        self.active = false;
    }

    /// Returns `true` while a drag is hovering the target.
    pub fn is_active(&self) -> bool {
        self.active
    }
}

struct AcceptedSelection {
    image: CapturedImage,
    preview: PreviewHandle,
}

/// Owns at most one accepted image and its preview for the session.
pub struct CaptureSurface {
    registry: PreviewRegistry,
    selection: Option<AcceptedSelection>,
    drag: DragState,
}

impl CaptureSurface {
    /// Creates an empty capture surface.
    pub fn new() -> Self {
        Self {
            registry: PreviewRegistry::new(),
            selection: None,
            drag: DragState::default(),
        }
    }

    /// Offers a dropped file to the surface.
    ///
    /// Acceptance replaces any prior image and revokes its preview. Files
    /// whose declared content type does not start with `image/` are ignored
    /// without error or mutation.
    pub fn offer(&mut self, file: SelectedFile) -> CaptureOutcome {
        self.drag.on_drop();
        self.accept(file)
    }

    /// Routes a file-picker invocation through the given source.
    ///
    /// The picker channel is suppressed while a preview exists, forcing the
    /// explicit change-image action before a new dialog can open.
    ///
    /// # Errors
    /// Returns [`CaptureError::Source`] when the dialog backend fails.
    pub fn request_from_picker(
        &mut self,
        source: &dyn ImageSource,
    ) -> Result<CaptureOutcome, CaptureError> {
        if self.selection.is_some() {
            return Ok(CaptureOutcome::PickerSuppressed);
        }

        match source.request_file_selection()? {
            Some(file) => Ok(self.accept(file)),
            None => Ok(CaptureOutcome::NoSelection),
        }
    }

    fn accept(&mut self, file: SelectedFile) -> CaptureOutcome {
        if !file.content_type.starts_with(IMAGE_CONTENT_TYPE_PREFIX) {
            return CaptureOutcome::IgnoredNonImage;
        }

        let image = match CapturedImage::new(file.file_name, file.content_type, file.bytes) {
            Ok(image) => image,
            Err(_) => return CaptureOutcome::IgnoredEmptyFile,
        };

        if let Some(previous) = self.selection.take() {
            self.registry.revoke(&previous.preview);
        }

        let preview = self.registry.issue();
        self.selection = Some(AcceptedSelection { image, preview });
        CaptureOutcome::Accepted
    }

    /// Clears the current image and revokes its preview.
    ///
    /// Clinical metadata is untouched; only the image side of the session is
    /// affected.
    ///
    /// # Returns
    /// `true` when an image was present and is now cleared.
    pub fn change_image(&mut self) -> bool {
        match self.selection.take() {
            Some(previous) => {
                self.registry.revoke(&previous.preview);
                true
            }
            None => false,
        }
    }

    /// Returns the accepted image, if any.
    pub fn image(&self) -> Option<&CapturedImage> {
        self.selection.as_ref().map(|selection| &selection.image)
    }

    /// Returns `true` when an image has been accepted.
    pub fn has_image(&self) -> bool {
        self.selection.is_some()
    }

    /// Returns the preview URI for the accepted image, if any.
    ///
    /// Defined if and only if an image is present.
    pub fn preview_uri(&self) -> Option<&str> {
        self.selection
            .as_ref()
            .map(|selection| selection.preview.uri())
    }

    /// Pointer entered the drop target while dragging.
    pub fn on_drag_enter(&mut self) {
        self.drag.on_drag_enter();
    }

    /// Pointer is moving over the drop target while dragging.
    pub fn on_drag_over(&mut self) {
        self.drag.on_drag_over();
    }

    /// Pointer left the drop target.
    pub fn on_drag_leave(&mut self) {
        self.drag.on_drag_leave();
    }

    /// Returns `true` while a drag is hovering the drop target.
    pub fn is_drag_active(&self) -> bool {
        self.drag.is_active()
    }

    /// Returns the number of live preview handles.
    pub fn active_preview_count(&self) -> usize {
        self.registry.active_count()
    }
}

impl Default for CaptureSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Capture layer error type.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// File selection backend failure.
    #[error("file selection source failure: {0}")]
    Source(String),
}
