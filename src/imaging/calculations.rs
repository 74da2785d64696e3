//! Pure calculation functions for sheet geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::{Margin, SourceRect};

/// Size of a card after trimming `margin` from every edge.
///
/// Returns `None` when the margins consume the whole image on either axis.
///
/// # Examples
/// ```
/// # use deck_sheet::imaging::{Dimensions, Margin, effective_size};
/// let card = Dimensions { width: 300, height: 420 };
/// let trimmed = effective_size(card, Margin { x: 10, y: 20 }).unwrap();
/// assert_eq!((trimmed.width, trimmed.height), (280, 380));
///
/// assert!(effective_size(card, Margin { x: 150, y: 0 }).is_none());
/// ```
pub fn effective_size(source: Dimensions, margin: Margin) -> Option<Dimensions> {
    let width = source.width.checked_sub(margin.x.checked_mul(2)?)?;
    let height = source.height.checked_sub(margin.y.checked_mul(2)?)?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Dimensions { width, height })
}

/// Region of a source image that lands on the sheet.
///
/// Origin is offset by the margin; size is [`effective_size`] of that image.
pub fn source_rect(source: Dimensions, margin: Margin) -> Option<SourceRect> {
    effective_size(source, margin).map(|size| SourceRect {
        x: margin.x,
        y: margin.y,
        width: size.width,
        height: size.height,
    })
}

/// Number of rows needed for `count` cards at `row_size` per row.
pub fn row_count(count: usize, row_size: u32) -> u32 {
    count.div_ceil(row_size as usize) as u32
}

/// Canvas dimensions for a page of `count` cards.
///
/// Width always reserves `row_size` columns, even when the last row is short.
/// Returns `None` when either side does not fit in a `u32`.
///
/// # Examples
/// ```
/// # use deck_sheet::imaging::{Dimensions, sheet_dimensions};
/// let cell = Dimensions { width: 300, height: 420 };
/// let sheet = sheet_dimensions(cell, 10, 53).unwrap();
/// assert_eq!((sheet.width, sheet.height), (3000, 2520));
///
/// assert!(sheet_dimensions(cell, 20_000_000, 1).is_none());
/// ```
pub fn sheet_dimensions(cell: Dimensions, row_size: u32, count: usize) -> Option<Dimensions> {
    Some(Dimensions {
        width: cell.width.checked_mul(row_size)?,
        height: cell.height.checked_mul(row_count(count, row_size))?,
    })
}

/// Top-left destination of the `index`-th card, filled row-major.
///
/// Only meaningful for indices on a canvas [`sheet_dimensions`] accepted;
/// every origin then lies inside that canvas and cannot overflow.
pub fn cell_origin(cell: Dimensions, row_size: u32, index: usize) -> (u32, u32) {
    let row = (index / row_size as usize) as u32;
    let col = (index % row_size as usize) as u32;
    (col * cell.width, row * cell.height)
}

/// Dimensions after downscaling, or `None` if the sheet fits under the ceiling.
///
/// The ratio is applied as-is; the result is not fitted to `max_width`.
/// Each axis is floored, with a floor of 1px so the bitmap stays valid.
///
/// # Examples
/// ```
/// # use deck_sheet::imaging::{Dimensions, downscaled_dimensions};
/// let sheet = Dimensions { width: 5000, height: 2100 };
/// let small = downscaled_dimensions(sheet, 4096, 0.25).unwrap();
/// assert_eq!((small.width, small.height), (1250, 525));
///
/// let fits = Dimensions { width: 4096, height: 2100 };
/// assert!(downscaled_dimensions(fits, 4096, 0.25).is_none());
///
/// // A one-row strip under 4px tall keeps a single pixel row
/// let strip = Dimensions { width: 4200, height: 3 };
/// let thin = downscaled_dimensions(strip, 4096, 0.25).unwrap();
/// assert_eq!((thin.width, thin.height), (1050, 1));
/// ```
pub fn downscaled_dimensions(sheet: Dimensions, max_width: u32, ratio: f64) -> Option<Dimensions> {
    if sheet.width <= max_width {
        return None;
    }
    let scale = |v: u32| ((v as f64 * ratio).floor() as u32).max(1);
    Some(Dimensions {
        width: scale(sheet.width),
        height: scale(sheet.height),
    })
}
