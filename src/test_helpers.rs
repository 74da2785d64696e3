//! Shared test utilities for the deck-sheet test suite.
//!
//! Builds synthetic card images on disk so backend and pipeline tests work
//! against real PNG files without checked-in fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let cards = fill_card_folder(&tmp.path().join("deck"), 12, 30, 42);
//! assert_eq!(cards.len(), 12);
//! ```

use image::{ImageEncoder, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Interior color of synthetic cards.
pub const FILL: Rgba<u8> = Rgba([200, 120, 40, 255]);

/// Frame color of bordered synthetic cards.
pub const BORDER: Rgba<u8> = Rgba([10, 10, 10, 255]);

fn write_png(path: &Path, img: &RgbaImage) {
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
}

/// Write a single-color PNG.
pub fn create_solid_png(path: &Path, width: u32, height: u32, color: Rgba<u8>) {
    write_png(path, &RgbaImage::from_pixel(width, height, color));
}

/// Write a [`FILL`] card framed by a `border`-pixel [`BORDER`] on every edge.
pub fn create_bordered_png(path: &Path, width: u32, height: u32, border: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let inside = x >= border && y >= border && x < width - border && y < height - border;
        if inside { FILL } else { BORDER }
    });
    write_png(path, &img);
}

// =========================================================================
// Folder setup
// =========================================================================

/// Create `dir` with `count` solid cards named `card-000.png`, `card-001.png`, ...
///
/// Returns the card paths in name order.
pub fn fill_card_folder(dir: &Path, count: usize, width: u32, height: u32) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir).unwrap();
    (0..count)
        .map(|i| {
            let path = dir.join(format!("card-{i:03}.png"));
            create_solid_png(&path, width, height, FILL);
            path
        })
        .collect()
}

/// Create `dir` with `count` empty placeholder files, for mock-backed tests.
pub fn fill_placeholder_folder(dir: &Path, count: usize) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir).unwrap();
    (0..count)
        .map(|i| {
            let path = dir.join(format!("card-{i:03}.png"));
            std::fs::write(&path, b"").unwrap();
            path
        })
        .collect()
}
