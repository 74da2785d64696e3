//! Splitting a card list into sheet-sized pages.
//!
//! Pages are consecutive, non-overlapping, and keep the input order. Every
//! page but the last is full; the last may be short. No input, no pages.

use std::path::PathBuf;

/// One sheet's worth of cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a> {
    /// Zero-based page number; also drives the output file suffix.
    pub index: usize,
    pub cards: &'a [PathBuf],
}

/// Split `cards` into pages of at most `per_page` entries.
///
/// A `per_page` of zero is treated as one; validated configs never produce it.
pub fn paginate(cards: &[PathBuf], per_page: usize) -> Vec<Page<'_>> {
    cards
        .chunks(per_page.max(1))
        .enumerate()
        .map(|(index, cards)| Page { index, cards })
        .collect()
}

/// Number of pages `count` cards fill.
pub fn page_count(count: usize, per_page: usize) -> usize {
    count.div_ceil(per_page.max(1))
}
