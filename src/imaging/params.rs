//! Parameter types for sheet operations.
//!
//! These structs describe *what* to draw, not *how* to draw it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides where every card goes) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing layout logic.
//!
//! ## Types
//!
//! - [`Margin`] — Pixels trimmed from each edge of every card.
//! - [`SourceRect`] — The region of a source image copied onto the sheet.
//! - [`Placement`] — One card: its source file and destination cell origin.
//! - [`SheetParams`] — Full specification for one sheet: canvas, cells, placements, output.

use super::backend::Dimensions;
use std::path::PathBuf;

/// Symmetric per-edge trim, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margin {
    pub x: u32,
    pub y: u32,
}

/// Rectangle inside a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A single card on a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub source: PathBuf,
    /// Destination of the cell's top-left corner on the canvas.
    pub x: u32,
    pub y: u32,
}

/// Parameters for composing and saving one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetParams {
    pub output: PathBuf,
    /// Composited canvas size, before any downscale.
    pub canvas: Dimensions,
    /// Size every card is drawn at.
    pub cell: Dimensions,
    pub margin: Margin,
    pub placements: Vec<Placement>,
    /// Final size when the canvas exceeds the width ceiling.
    pub resize_to: Option<Dimensions>,
}

impl SheetParams {
    /// Pixel size of the file that will be written.
    pub fn output_dimensions(&self) -> Dimensions {
        self.resize_to.unwrap_or(self.canvas)
    }
}
