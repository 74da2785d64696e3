//! Folder-to-sheets pipeline.
//!
//! Takes a source folder of cards and writes one PNG sheet per page into the
//! target folder:
//!
//! ```text
//! Goblins/ (53 cards, 10 per row, 5 rows)
//!   → Goblins.png    50 cards, 10×5 grid
//!   → Goblins1.png    3 cards, 10×1 grid (full row width reserved)
//! ```
//!
//! ## Steps
//!
//! 1. List the folder (sorted by name) and split it into pages.
//! 2. Identify the first card; its trimmed size is the cell size for the run.
//! 3. For each page: plan, compose, downscale if over the ceiling, save.
//!
//! Pages are rendered strictly one after another and each sheet bitmap is
//! released before the next page starts. Any error ends the run; sheets
//! already written stay on disk.
//!
//! Progress is reported through a callback of [`CombineEvent`]s. The pipeline
//! itself never prints; see [`crate::output`].

use crate::batch::{self, Page};
use crate::config::{ConfigError, SheetConfig};
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, Margin, RustBackend, create_sheet, effective_size,
    get_dimensions, row_count, sheet_dimensions,
};
use crate::naming::{manifest_file_name, sheet_file_name};
use crate::scan::{self, ScanError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CombineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Margins {margin_x}x{margin_y} leave no pixels of {width}x{height} card {}", .path.display())]
    MarginTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        margin_x: u32,
        margin_y: u32,
    },
    #[error("A sheet of {columns}x{rows} cards at {card_width}x{card_height} exceeds the maximum image size")]
    SheetTooLarge {
        columns: u32,
        rows: u32,
        card_width: u32,
        card_height: u32,
    },
}

/// Progress notifications emitted while combining.
#[derive(Debug, Clone, PartialEq)]
pub enum CombineEvent {
    /// A missing source or target folder was created.
    FolderCreated { path: PathBuf },
    /// The source folder was listed and paginated.
    Scanned {
        source: PathBuf,
        card_count: usize,
        page_count: usize,
    },
    /// A sheet was written to disk.
    SheetWritten(SheetRecord),
}

/// What was written for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRecord {
    /// Zero-based page index.
    pub index: usize,
    /// Output file name, relative to the target folder.
    pub file: String,
    #[serde(skip)]
    pub path: PathBuf,
    pub card_count: usize,
    /// Grid columns; always the configured row size.
    pub columns: u32,
    pub rows: u32,
    /// Size of one card in the written image.
    pub card_size: Dimensions,
    /// Size of the composited sheet before downscaling.
    pub composited: Dimensions,
    /// Size of the written image.
    pub written: Dimensions,
    pub downscaled: bool,
    /// Card files in grid order, relative to the source folder.
    pub cards: Vec<String>,
}

/// Manifest describing all sheets from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombineManifest {
    /// Source folder name, also the sheet base name.
    pub name: String,
    pub source: PathBuf,
    pub target: PathBuf,
    pub config: SheetConfig,
    pub sheets: Vec<SheetRecord>,
}

impl CombineManifest {
    /// Total cards across all sheets.
    pub fn card_count(&self) -> usize {
        self.sheets.iter().map(|s| s.card_count).sum()
    }
}

/// Create the source and target folders if they do not exist yet.
pub fn prepare_folders(
    source: &Path,
    target: &Path,
    on_event: &mut impl FnMut(CombineEvent),
) -> Result<(), CombineError> {
    for dir in [source, target] {
        if scan::ensure_folder(dir)? {
            on_event(CombineEvent::FolderCreated {
                path: dir.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Combine `source` into sheets in `target` using the pure Rust backend.
pub fn combine(
    source: &Path,
    target: &Path,
    config: &SheetConfig,
    on_event: impl FnMut(CombineEvent),
) -> Result<CombineManifest, CombineError> {
    combine_with_backend(&RustBackend::new(), source, target, config, on_event)
}

/// Combine with a custom backend (for testing).
pub fn combine_with_backend(
    backend: &impl ImageBackend,
    source: &Path,
    target: &Path,
    config: &SheetConfig,
    mut on_event: impl FnMut(CombineEvent),
) -> Result<CombineManifest, CombineError> {
    config.validate()?;

    let name = scan::folder_name(source)?;
    let cards = scan::list_source_files(source)?;
    let pages = batch::paginate(&cards, config.layout.files_per_page());

    on_event(CombineEvent::Scanned {
        source: source.to_path_buf(),
        card_count: cards.len(),
        page_count: pages.len(),
    });

    let mut manifest = CombineManifest {
        name,
        source: source.to_path_buf(),
        target: target.to_path_buf(),
        config: config.clone(),
        sheets: Vec::new(),
    };

    let Some(first) = cards.first() else {
        return Ok(manifest);
    };
    let cell = reference_cell(backend, first, config)?;
    check_sheet_size(&pages, cell, config)?;

    for page in &pages {
        let record = render_page(backend, page, cell, config, &manifest.name, source, target)?;
        on_event(CombineEvent::SheetWritten(record.clone()));
        manifest.sheets.push(record);
    }

    Ok(manifest)
}

/// Trimmed size of the run's first card, which every cell uses.
fn reference_cell(
    backend: &impl ImageBackend,
    first: &Path,
    config: &SheetConfig,
) -> Result<Dimensions, CombineError> {
    let dims = get_dimensions(backend, first)?;
    let margin = Margin {
        x: config.layout.margin_x,
        y: config.layout.margin_y,
    };
    effective_size(dims, margin).ok_or_else(|| CombineError::MarginTooLarge {
        path: first.to_path_buf(),
        width: dims.width,
        height: dims.height,
        margin_x: margin.x,
        margin_y: margin.y,
    })
}

/// Reject a layout whose largest sheet cannot be represented, before any
/// sheet is drawn. The first page is always the fullest.
fn check_sheet_size(
    pages: &[Page<'_>],
    cell: Dimensions,
    config: &SheetConfig,
) -> Result<(), CombineError> {
    let columns = config.layout.row_size;
    let largest = pages.first().map_or(0, |p| p.cards.len());
    match sheet_dimensions(cell, columns, largest) {
        Some(_) => Ok(()),
        None => Err(CombineError::SheetTooLarge {
            columns,
            rows: row_count(largest, columns),
            card_width: cell.width,
            card_height: cell.height,
        }),
    }
}

fn render_page(
    backend: &impl ImageBackend,
    page: &Page<'_>,
    cell: Dimensions,
    config: &SheetConfig,
    base: &str,
    source: &Path,
    target: &Path,
) -> Result<SheetRecord, CombineError> {
    let file = sheet_file_name(base, page.index);
    let output = target.join(&file);
    let params = create_sheet(backend, page.cards, cell, config, &output)?;

    let written = params.output_dimensions();
    let columns = config.layout.row_size;
    let rows = row_count(page.cards.len(), columns);

    Ok(SheetRecord {
        index: page.index,
        file,
        path: output,
        card_count: page.cards.len(),
        columns,
        rows,
        card_size: Dimensions {
            width: written.width / columns,
            height: written.height / rows,
        },
        composited: params.canvas,
        written,
        downscaled: params.resize_to.is_some(),
        cards: page
            .cards
            .iter()
            .map(|p| {
                p.strip_prefix(source)
                    .unwrap_or(p)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect(),
    })
}

/// Write the manifest as pretty JSON next to the sheets.
///
/// Returns the manifest path.
pub fn write_manifest(manifest: &CombineManifest) -> Result<PathBuf, CombineError> {
    let path = manifest.target.join(manifest_file_name(&manifest.name));
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::fill_placeholder_folder;
    use tempfile::TempDir;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    fn run(
        backend: &MockBackend,
        source: &Path,
        target: &Path,
        config: &SheetConfig,
    ) -> (Result<CombineManifest, CombineError>, Vec<CombineEvent>) {
        let mut events = Vec::new();
        let result = combine_with_backend(backend, source, target, config, |e| events.push(e));
        (result, events)
    }

    #[test]
    fn fifty_three_cards_make_two_sheets() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("Goblins");
        fill_placeholder_folder(&source, 53);
        let backend = MockBackend::with_dimensions(vec![dims(300, 420)]);

        let (result, _) = run(&backend, &source, tmp.path(), &SheetConfig::default());
        let manifest = result.unwrap();

        assert_eq!(manifest.name, "Goblins");
        assert_eq!(manifest.sheets.len(), 2);
        assert_eq!(manifest.card_count(), 53);

        let first = &manifest.sheets[0];
        assert_eq!(first.file, "Goblins.png");
        assert_eq!(first.card_count, 50);
        assert_eq!(first.written, dims(3000, 2100));
        assert_eq!((first.columns, first.rows), (10, 5));

        let second = &manifest.sheets[1];
        assert_eq!(second.file, "Goblins1.png");
        assert_eq!(second.card_count, 3);
        assert_eq!(second.written, dims(3000, 420));
        assert_eq!(second.rows, 1);
        assert_eq!(second.cards, vec!["card-050.png", "card-051.png", "card-052.png"]);
    }

    #[test]
    fn identifies_only_the_first_card() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("deck");
        fill_placeholder_folder(&source, 120);
        let backend = MockBackend::with_dimensions(vec![dims(100, 140)]);

        let (result, _) = run(&backend, &source, tmp.path(), &SheetConfig::default());
        result.unwrap();

        let identifies: Vec<_> = backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Identify(_)))
            .collect();
        assert_eq!(identifies.len(), 1);
        assert!(matches!(&identifies[0], RecordedOp::Identify(p) if p.ends_with("card-000.png")));
        assert_eq!(backend.rendered().len(), 3);
    }

    #[test]
    fn renders_pages_in_order_with_suffixes() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("deck");
        let target = tmp.path().join("out");
        std::fs::create_dir(&target).unwrap();
        fill_placeholder_folder(&source, 7);
        let backend = MockBackend::with_dimensions(vec![dims(10, 10)]);
        let config = SheetConfig {
            layout: LayoutConfig {
                row_size: 2,
                max_rows: 1,
                ..LayoutConfig::default()
            },
            ..SheetConfig::default()
        };

        let (result, _) = run(&backend, &source, &target, &config);
        result.unwrap();

        let outputs: Vec<String> = backend
            .rendered()
            .into_iter()
            .map(|op| match op {
                RecordedOp::RenderSheet { output, .. } => output,
                _ => unreachable!(),
            })
            .collect();
        let expected: Vec<String> = ["deck.png", "deck1.png", "deck2.png", "deck3.png"]
            .iter()
            .map(|f| target.join(f).to_string_lossy().into_owned())
            .collect();
        assert_eq!(outputs, expected);
    }

    #[test]
    fn empty_folder_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("empty");
        std::fs::create_dir(&source).unwrap();
        let backend = MockBackend::new();

        let (result, events) = run(&backend, &source, tmp.path(), &SheetConfig::default());
        let manifest = result.unwrap();

        assert!(manifest.sheets.is_empty());
        assert!(backend.get_operations().is_empty());
        assert_eq!(
            events,
            vec![CombineEvent::Scanned {
                source: source.clone(),
                card_count: 0,
                page_count: 0,
            }]
        );
    }

    #[test]
    fn margins_shrink_cells() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("deck");
        fill_placeholder_folder(&source, 2);
        let backend = MockBackend::with_dimensions(vec![dims(300, 420)]);
        let config = SheetConfig {
            layout: LayoutConfig {
                margin_x: 10,
                margin_y: 20,
                ..LayoutConfig::default()
            },
            ..SheetConfig::default()
        };

        let (result, _) = run(&backend, &source, tmp.path(), &config);
        let manifest = result.unwrap();

        assert_eq!(manifest.sheets[0].card_size, dims(280, 380));
        assert_eq!(manifest.sheets[0].composited, dims(2800, 380));
    }

    #[test]
    fn oversized_margins_fail_before_rendering() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("deck");
        fill_placeholder_folder(&source, 3);
        let backend = MockBackend::with_dimensions(vec![dims(300, 420)]);
        let config = SheetConfig {
            layout: LayoutConfig {
                margin_y: 210,
                ..LayoutConfig::default()
            },
            ..SheetConfig::default()
        };

        let (result, _) = run(&backend, &source, tmp.path(), &config);
        assert!(matches!(result, Err(CombineError::MarginTooLarge { height: 420, .. })));
        assert!(backend.rendered().is_empty());
    }

    #[test]
    fn overflowing_row_fails_before_rendering() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("deck");
        fill_placeholder_folder(&source, 2);
        let backend = MockBackend::with_dimensions(vec![dims(300, 420)]);
        let config = SheetConfig {
            layout: LayoutConfig {
                row_size: 20_000_000,
                ..LayoutConfig::default()
            },
            ..SheetConfig::default()
        };

        let (result, _) = run(&backend, &source, tmp.path(), &config);
        assert!(matches!(
            result,
            Err(CombineError::SheetTooLarge {
                columns: 20_000_000,
                rows: 1,
                card_width: 300,
                ..
            })
        ));
        assert!(backend.rendered().is_empty());
    }

    #[test]
    fn overflowing_column_fails_before_rendering() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("deck");
        fill_placeholder_folder(&source, 3);
        let backend = MockBackend::with_dimensions(vec![dims(300, 2_000_000_000)]);
        let config = SheetConfig {
            layout: LayoutConfig {
                row_size: 1,
                max_rows: 3,
                ..LayoutConfig::default()
            },
            ..SheetConfig::default()
        };

        let (result, _) = run(&backend, &source, tmp.path(), &config);
        assert!(matches!(result, Err(CombineError::SheetTooLarge { rows: 3, .. })));
        assert!(backend.rendered().is_empty());
    }

    #[test]
    fn downscaled_sheet_is_recorded() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("deck");
        fill_placeholder_folder(&source, 4);
        let backend = MockBackend::with_dimensions(vec![dims(500, 700)]);

        let (result, _) = run(&backend, &source, tmp.path(), &SheetConfig::default());
        let sheet = &result.unwrap().sheets[0];

        // 10 × 500 = 5000 > 4096 → quartered
        assert!(sheet.downscaled);
        assert_eq!(sheet.composited, dims(5000, 700));
        assert_eq!(sheet.written, dims(1250, 175));
        assert_eq!(sheet.card_size, dims(125, 175));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let mut config = SheetConfig::default();
        config.layout.row_size = 0;

        let (result, events) = run(&backend, tmp.path(), tmp.path(), &config);
        assert!(matches!(result, Err(CombineError::Config(_))));
        assert!(events.is_empty());
    }

    #[test]
    fn missing_source_is_scan_error() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let (result, _) = run(
            &backend,
            &tmp.path().join("nope"),
            tmp.path(),
            &SheetConfig::default(),
        );
        assert!(matches!(result, Err(CombineError::Scan(ScanError::NotADirectory(_)))));
    }

    #[test]
    fn events_report_each_sheet() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("deck");
        fill_placeholder_folder(&source, 51);
        let backend = MockBackend::with_dimensions(vec![dims(20, 30)]);

        let (result, events) = run(&backend, &source, tmp.path(), &SheetConfig::default());
        result.unwrap();

        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            CombineEvent::Scanned { card_count: 51, page_count: 2, .. }
        ));
        assert!(matches!(&events[2], CombineEvent::SheetWritten(r) if r.file == "deck1.png"));
    }

    #[test]
    fn prepare_folders_creates_missing() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src");
        let target = tmp.path().join("dst");
        std::fs::create_dir(&source).unwrap();

        let mut events = Vec::new();
        prepare_folders(&source, &target, &mut |e| events.push(e)).unwrap();

        assert!(target.is_dir());
        assert_eq!(events, vec![CombineEvent::FolderCreated { path: target }]);
    }

    #[test]
    fn write_manifest_serializes_sheets() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("deck");
        fill_placeholder_folder(&source, 12);
        let backend = MockBackend::with_dimensions(vec![dims(40, 60)]);

        let (result, _) = run(&backend, &source, tmp.path(), &SheetConfig::default());
        let path = write_manifest(&result.unwrap()).unwrap();
        assert_eq!(path, tmp.path().join("deck.json"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["name"], "deck");
        assert_eq!(json["sheets"][0]["file"], "deck.png");
        assert_eq!(json["sheets"][0]["columns"], 10);
        assert_eq!(json["sheets"][0]["rows"], 2);
        assert_eq!(json["sheets"][0]["written"]["width"], 400);
        assert_eq!(json["config"]["layout"]["row_size"], 10);
        assert!(json["sheets"][0].get("path").is_none());
    }
}
