//! Source folder discovery.
//!
//! A card folder is flat: every immediate child file is a card, whatever its
//! extension. Subdirectories are ignored and nothing is recursed into. Files
//! that are not decodable images are still listed; they fail later, when the
//! sheet containing them is drawn.
//!
//! ```text
//! Goblins/                # Source folder; its name becomes the sheet name
//! ├── 001-grunt.png       # Cards are ordered by file name
//! ├── 002-shaman.png
//! ├── 010-warboss.jpg     # Mixed formats are fine
//! └── extras/             # Ignored
//! ```
//!
//! Listings are sorted by file name so pagination is deterministic across
//! filesystems.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to list source folder: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Cannot derive a sheet name from folder: {0}")]
    NoFolderName(PathBuf),
    #[error("Folder has no parent to write sheets into: {0}")]
    NoParent(PathBuf),
}

/// List the cards in `dir`, sorted by file name.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Absolute form of `dir` with `.` and `..` resolved lexically.
///
/// The folder need not exist yet. Symlinks are not followed, so
/// `link/..` means the folder containing `link`.
pub fn resolve_folder(dir: &Path) -> Result<PathBuf, ScanError> {
    let absolute = std::path::absolute(dir)?;
    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    Ok(resolved)
}

/// Sheet base name: the final component of the resolved source path.
pub fn folder_name(dir: &Path) -> Result<String, ScanError> {
    let resolved = resolve_folder(dir)?;
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or(ScanError::NoFolderName(resolved))
}

/// Default target: the parent of the resolved source folder.
pub fn default_target(source: &Path) -> Result<PathBuf, ScanError> {
    let resolved = resolve_folder(source)?;
    resolved
        .parent()
        .map(Path::to_path_buf)
        .ok_or(ScanError::NoParent(resolved))
}

/// Create `dir` (and parents) if missing. Returns `true` if it was created.
pub fn ensure_folder(dir: &Path) -> Result<bool, ScanError> {
    if dir.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(dir)?;
    Ok(true)
}
