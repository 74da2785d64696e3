//! Pure Rust sheet backend with no system imaging libraries.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP, BMP, GIF) | `image` crate (pure Rust decoders) |
//! | Margin trim | `image::imageops::crop_imm` |
//! | Cell fit / downscale | `image::imageops::resize` with `CatmullRom` (bicubic) |
//! | Compose | `image::imageops::replace` onto a transparent `RgbaImage` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA, 8 bits per channel) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::source_rect;
use super::params::{Placement, SheetParams};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, RgbaImage};
use std::path::Path;

/// Bicubic resampling for both cell fitting and sheet downscaling.
const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open an image reader, sniffing the format from content.
///
/// Card folders are not filtered by extension, so the extension is only a hint.
fn open_reader(
    path: &Path,
) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open_reader(path)?.decode().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })
}

/// Decode one card, trim its margins, and fit it to the sheet cell.
fn load_card(placement: &Placement, params: &SheetParams) -> Result<RgbaImage, BackendError> {
    let img = load_image(&placement.source)?.into_rgba8();
    let dims = Dimensions {
        width: img.width(),
        height: img.height(),
    };
    let rect = source_rect(dims, params.margin).ok_or_else(|| {
        BackendError::ProcessingFailed(format!(
            "Margins {}x{} leave no pixels of {} ({}x{})",
            params.margin.x,
            params.margin.y,
            placement.source.display(),
            dims.width,
            dims.height
        ))
    })?;

    let cropped = imageops::crop_imm(&img, rect.x, rect.y, rect.width, rect.height).to_image();
    if (rect.width, rect.height) == (params.cell.width, params.cell.height) {
        Ok(cropped)
    } else {
        Ok(imageops::resize(
            &cropped,
            params.cell.width,
            params.cell.height,
            RESAMPLE_FILTER,
        ))
    }
}

/// Draw every placement onto a fresh transparent canvas.
fn compose(params: &SheetParams) -> Result<RgbaImage, BackendError> {
    let mut canvas = RgbaImage::new(params.canvas.width, params.canvas.height);
    for placement in &params.placements {
        let card = load_card(placement, params)?;
        imageops::replace(&mut canvas, &card, i64::from(placement.x), i64::from(placement.y));
    }
    Ok(canvas)
}

/// Encode and save as 8-bit RGBA PNG.
fn save_png(img: &RgbaImage, path: &Path) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    PngEncoder::new(writer)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("PNG encode failed for {}: {}", path.display(), e))
        })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_reader(path)?.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn render_sheet(&self, params: &SheetParams) -> Result<(), BackendError> {
        let canvas = compose(params)?;

        // The full-size canvas is released before encoding the scaled copy.
        let sheet = match params.resize_to {
            Some(size) => {
                let scaled = imageops::resize(&canvas, size.width, size.height, RESAMPLE_FILTER);
                drop(canvas);
                scaled
            }
            None => canvas,
        };

        save_png(&sheet, &params.output)
    }
}
