//! Output file naming.
//!
//! Sheets are named after the source folder. The first sheet carries the bare
//! name; later sheets append their zero-based page index with no padding and
//! no separator:
//!
//! - page 0 of `Goblins/` → `Goblins.png`
//! - page 1 of `Goblins/` → `Goblins1.png`
//! - page 12 of `Goblins/` → `Goblins12.png`

/// Extension of every written sheet.
pub const SHEET_EXTENSION: &str = "png";

/// File name for page `index` of a run based on `base`.
pub fn sheet_file_name(base: &str, index: usize) -> String {
    if index == 0 {
        format!("{base}.{SHEET_EXTENSION}")
    } else {
        format!("{base}{index}.{SHEET_EXTENSION}")
    }
}

/// File name of the JSON sheet manifest for a run based on `base`.
pub fn manifest_file_name(base: &str) -> String {
    format!("{base}.json")
}
