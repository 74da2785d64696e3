//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the sheet pipeline
//! needs: identify a card's dimensions, and render a planned sheet to disk.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust, statically
//! linked, no system imaging libraries.

use super::params::SheetParams;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image or sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image backends.
///
/// Rendering is a single call so a backend can acquire and release the whole
/// sheet bitmap inside it; nothing outlives one page.
pub trait ImageBackend {
    /// Get image dimensions without decoding pixels.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Compose the planned sheet, downscale if requested, and save it.
    fn render_sheet(&self, params: &SheetParams) -> Result<(), BackendError>;
}
