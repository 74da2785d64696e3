//! High-level sheet operations.
//!
//! These functions combine calculations with backend execution.
//! They take a page of cards and the configuration, compute where every card
//! lands, and hand the finished plan to the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{cell_origin, downscaled_dimensions, sheet_dimensions};
use super::params::{Margin, Placement, SheetParams};
use crate::config::SheetConfig;
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Dimensions> {
    backend.identify(path)
}

/// Plan a sheet without rendering it.
///
/// `cell` is the trimmed size of the run's reference card; every card on the
/// sheet is drawn at that size. Fails if the canvas would not fit in `u32`
/// pixels on either side.
pub fn plan_sheet(
    cards: &[PathBuf],
    cell: Dimensions,
    config: &SheetConfig,
    output: &Path,
) -> Result<SheetParams> {
    let row_size = config.layout.row_size;
    let canvas = sheet_dimensions(cell, row_size, cards.len()).ok_or_else(|| {
        BackendError::ProcessingFailed(format!(
            "{} cards of {}x{} at {row_size} per row exceed the maximum sheet size",
            cards.len(),
            cell.width,
            cell.height
        ))
    })?;

    let placements = cards
        .iter()
        .enumerate()
        .map(|(i, source)| {
            let (x, y) = cell_origin(cell, row_size, i);
            Placement {
                source: source.clone(),
                x,
                y,
            }
        })
        .collect();

    Ok(SheetParams {
        output: output.to_path_buf(),
        canvas,
        cell,
        margin: Margin {
            x: config.layout.margin_x,
            y: config.layout.margin_y,
        },
        placements,
        resize_to: downscaled_dimensions(
            canvas,
            config.downscale.max_width,
            config.downscale.ratio,
        ),
    })
}

/// Plan and render one sheet.
///
/// Returns the executed plan so callers can report what was written.
pub fn create_sheet(
    backend: &impl ImageBackend,
    cards: &[PathBuf],
    cell: Dimensions,
    config: &SheetConfig,
    output: &Path,
) -> Result<SheetParams> {
    let params = plan_sheet(cards, cell, config, output)?;
    backend.render_sheet(&params)?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    fn cards(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("/deck/{i:02}.png"))).collect()
    }

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(vec![dims(300, 420)]);
        assert_eq!(
            get_dimensions(&backend, Path::new("/deck/00.png")).unwrap(),
            dims(300, 420)
        );
    }

    #[test]
    fn plan_full_page() {
        let params = plan_sheet(
            &cards(50),
            dims(300, 420),
            &SheetConfig::default(),
            Path::new("/out/deck.png"),
        )
        .unwrap();

        assert_eq!(params.canvas, dims(3000, 2100));
        assert_eq!(params.placements.len(), 50);
        assert_eq!(params.resize_to, None);
        // Last card: row 4, column 9
        let last = params.placements.last().unwrap();
        assert_eq!((last.x, last.y), (2700, 1680));
    }

    #[test]
    fn plan_short_page_keeps_full_width() {
        let params = plan_sheet(
            &cards(3),
            dims(300, 420),
            &SheetConfig::default(),
            Path::new("/out/deck1.png"),
        )
        .unwrap();

        assert_eq!(params.canvas, dims(3000, 420));
        let origins: Vec<(u32, u32)> = params.placements.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(origins, vec![(0, 0), (300, 0), (600, 0)]);
    }

    #[test]
    fn plan_preserves_card_order() {
        let input = cards(5);
        let params = plan_sheet(
            &input,
            dims(10, 10),
            &SheetConfig::default(),
            Path::new("/out/deck.png"),
        )
        .unwrap();
        let sources: Vec<PathBuf> = params.placements.into_iter().map(|p| p.source).collect();
        assert_eq!(sources, input);
    }

    #[test]
    fn plan_carries_margins() {
        let config = SheetConfig {
            layout: LayoutConfig {
                margin_x: 7,
                margin_y: 11,
                ..LayoutConfig::default()
            },
            ..SheetConfig::default()
        };
        let params = plan_sheet(&cards(1), dims(286, 398), &config, Path::new("/o.png")).unwrap();
        assert_eq!(params.margin, Margin { x: 7, y: 11 });
        assert_eq!(params.cell, dims(286, 398));
    }

    #[test]
    fn plan_requests_downscale_over_ceiling() {
        // 10 columns of 410px = 4100px wide → quartered
        let params = plan_sheet(
            &cards(12),
            dims(410, 600),
            &SheetConfig::default(),
            Path::new("/out/deck.png"),
        )
        .unwrap();
        assert_eq!(params.canvas, dims(4100, 1200));
        assert_eq!(params.resize_to, Some(dims(1025, 300)));
        assert_eq!(params.output_dimensions(), dims(1025, 300));
    }

    #[test]
    fn plan_rejects_sheet_wider_than_u32() {
        let config = SheetConfig {
            layout: LayoutConfig {
                row_size: 20_000_000,
                ..LayoutConfig::default()
            },
            ..SheetConfig::default()
        };
        let result = plan_sheet(&cards(1), dims(300, 420), &config, Path::new("/o.png"));
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn create_sheet_skips_render_when_plan_fails() {
        let backend = MockBackend::new();
        let config = SheetConfig {
            layout: LayoutConfig {
                row_size: 20_000_000,
                ..LayoutConfig::default()
            },
            ..SheetConfig::default()
        };
        let result = create_sheet(&backend, &cards(1), dims(300, 420), &config, Path::new("/o.png"));
        assert!(result.is_err());
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn create_sheet_renders_plan() {
        let backend = MockBackend::new();
        let params = create_sheet(
            &backend,
            &cards(2),
            dims(50, 70),
            &SheetConfig::default(),
            Path::new("/out/deck.png"),
        )
        .unwrap();

        assert_eq!(params.canvas, dims(500, 70));
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::RenderSheet { output, canvas: (500, 70), sources, .. }
                if output == "/out/deck.png" && sources.len() == 2
        ));
    }
}
