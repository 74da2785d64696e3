//! # Deck Sheet
//!
//! Tiles a folder of same-sized card images into paginated grid sheets, the
//! format tabletop simulators expect for custom decks. Cards can have a fixed
//! margin trimmed from every edge, and sheets that come out too wide are
//! scaled down before they are saved.
//!
//! # Architecture: Folder → Pages → Sheets
//!
//! ```text
//! 1. Scan      Goblins/        →  sorted card list
//! 2. Batch     card list       →  pages of row_size × max_rows
//! 3. Compose   page            →  RGBA canvas, cards row-major
//! 4. Downscale canvas          →  quartered copy if wider than 4096px
//! 5. Save      sheet           →  Goblins.png, Goblins1.png, ...
//! ```
//!
//! Steps 3–5 run once per page, strictly in order, and each sheet bitmap is
//! dropped before the next page starts so memory stays bounded to one sheet.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Lists the source folder (flat, sorted by name), resolves folder names and default target |
//! | [`batch`] | Splits the card list into pages |
//! | [`imaging`] | Sheet geometry, planning, and the pure-Rust compositing backend |
//! | [`combine`] | Pipeline driver: pages → sheets on disk, progress events, JSON manifest |
//! | [`naming`] | Output file names (`Goblins.png`, `Goblins1.png`, ...) |
//! | [`config`] | Layered TOML configuration, validation, stock config |
//! | [`output`] | CLI output formatting for progress events |
//!
//! # Design Decisions
//!
//! ## Sorted Listings
//!
//! Directory iteration order is filesystem-dependent. Cards are sorted by file
//! name so the same folder always produces the same sheets; prefix card names
//! with numbers (`001-`, `002-`) to control placement.
//!
//! ## One Reference Size Per Run
//!
//! The first card's trimmed size sets the cell size for every sheet of the
//! run. Cards of a different size are trimmed by the same margins and then
//! resampled into the cell rather than breaking the grid.
//!
//! ## Fixed Downscale Ratio
//!
//! A sheet wider than the ceiling is scaled by a fixed factor (0.25 by
//! default), not by the factor that would make it fit exactly. Both numbers
//! are configurable under `[downscale]`.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, compositing, resampling, and PNG encoding all go through the
//! `image` crate. The binary has no system library dependencies.

pub mod batch;
pub mod combine;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
