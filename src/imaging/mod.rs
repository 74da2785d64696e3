//! Sheet imaging in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Trim** | `imageops::crop_imm` at the margin offset |
//! | **Compose** | `imageops::replace` into a transparent RGBA canvas |
//! | **Downscale** | `imageops::resize` with Catmull-Rom (bicubic) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for sheet geometry (unit testable)
//! - **Parameters**: Data structures describing a sheet to draw
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    cell_origin, downscaled_dimensions, effective_size, row_count, sheet_dimensions, source_rect,
};
pub use operations::{create_sheet, get_dimensions, plan_sheet};
pub use params::{Margin, Placement, SheetParams, SourceRect};
pub use rust_backend::RustBackend;
