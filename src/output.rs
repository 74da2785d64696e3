//! CLI output formatting for the combine run.
//!
//! # Information-First Display
//!
//! Each sheet leads with its positional index and file name, followed by the
//! grid it holds. Pixel sizes and downscaling are shown as indented context
//! lines underneath, so the output reads as an inventory of what was written.
//!
//! # Output Format
//!
//! ```text
//! Using Source Folder /games/decks/Goblins
//! Using Target Folder /games/decks
//! Creating 10 cards per row, max 5 rows
//! Found 53 cards → 2 sheets
//! 001 Goblins.png (50 cards, 10×5)
//!     3000×2100
//! 002 Goblins1.png (3 cards, 10×1)
//!     3000×420
//!
//! Wrote 2 sheets (53 cards) → /games/decks
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function returns `Vec<String>` for testability and has a
//! `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::combine::{CombineEvent, CombineManifest, SheetRecord};
use crate::config::SheetConfig;
use crate::imaging::Dimensions;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn format_size(size: Dimensions) -> String {
    format!("{}\u{d7}{}", size.width, size.height)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Run header
// ============================================================================

/// Format the folders a run reads from and writes to.
///
/// `target_defaulted` is set when no target was given on the command line.
pub fn format_folders(source: &Path, target: &Path, target_defaulted: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if target_defaulted {
        lines.push(format!(
            "Target Folder not specified, using parent of source folder: {}",
            target.display()
        ));
    }
    lines.push(format!("Using Source Folder {}", source.display()));
    lines.push(format!("Using Target Folder {}", target.display()));
    lines
}

/// Format the grid shape and trimming in effect.
pub fn format_layout_header(config: &SheetConfig) -> Vec<String> {
    let layout = &config.layout;
    let mut lines = vec![format!(
        "Creating {} cards per row, max {} rows",
        layout.row_size, layout.max_rows
    )];
    if layout.margin_x > 0 || layout.margin_y > 0 {
        lines.push(format!(
            "    Trimming {}px left/right, {}px top/bottom",
            layout.margin_x, layout.margin_y
        ));
    }
    lines
}

// ============================================================================
// Events
// ============================================================================

/// Format one sheet: header line plus pixel size context.
///
/// ```text
/// 002 Goblins1.png (3 cards, 10×1)
///     5000×700 → 1250×175 (downscaled)
/// ```
fn sheet_lines(record: &SheetRecord) -> Vec<String> {
    let header = format!(
        "{} {} ({}, {}\u{d7}{})",
        format_index(record.index + 1),
        record.file,
        plural(record.card_count, "card", "cards"),
        record.columns,
        record.rows
    );
    let size = if record.downscaled {
        format!(
            "    {} \u{2192} {} (downscaled)",
            format_size(record.composited),
            format_size(record.written)
        )
    } else {
        format!("    {}", format_size(record.written))
    };
    vec![header, size]
}

/// Format a progress event from the combine pipeline.
pub fn format_combine_event(event: &CombineEvent) -> Vec<String> {
    match event {
        CombineEvent::FolderCreated { path } => {
            vec![format!("Folder {} didn't exist, created it", path.display())]
        }
        CombineEvent::Scanned {
            card_count,
            page_count,
            ..
        } => vec![format!(
            "Found {} \u{2192} {}",
            plural(*card_count, "card", "cards"),
            plural(*page_count, "sheet", "sheets")
        )],
        CombineEvent::SheetWritten(record) => sheet_lines(record),
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the closing summary of a run.
pub fn format_summary(manifest: &CombineManifest) -> Vec<String> {
    if manifest.sheets.is_empty() {
        return vec![
            String::new(),
            format!("No cards in {}, nothing written", manifest.source.display()),
        ];
    }
    vec![
        String::new(),
        format!(
            "Wrote {} ({}) \u{2192} {}",
            plural(manifest.sheets.len(), "sheet", "sheets"),
            plural(manifest.card_count(), "card", "cards"),
            manifest.target.display()
        ),
    ]
}

// ============================================================================
// Print wrappers
// ============================================================================

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_folders(source: &Path, target: &Path, target_defaulted: bool) {
    print_lines(format_folders(source, target, target_defaulted));
}

pub fn print_layout_header(config: &SheetConfig) {
    print_lines(format_layout_header(config));
}

pub fn print_combine_event(event: &CombineEvent) {
    print_lines(format_combine_event(event));
}

pub fn print_summary(manifest: &CombineManifest) {
    print_lines(format_summary(manifest));
}
