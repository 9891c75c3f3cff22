//! Prefix-sum window index over a planned row sequence.
//!
//! Backed by a Fenwick tree so offset queries and the scroll-position
//! binary search stay O(log n) while rows are appended in O(log n).
//!
//! Heights are constant per row kind, but the index is still worth
//! building: the renderer needs `scroll offset -> first visible row` in
//! both directions every frame, over sequences that change shape on every
//! expansion toggle or load-more.

use super::heights::{card_height, row_height};
use super::virtual_row::VirtualRow;
use std::ops::Range;

/// Which height table a window is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Regular table rows.
    Row,
    /// Stacked cards (narrow viewports).
    Card,
}

/// Cumulative pixel offsets over one flattened row sequence.
///
/// Rebuild it whenever the row sequence is recomputed; it is cheap relative
/// to flattening and has no incremental-patch obligations.
#[derive(Debug, Clone)]
pub struct RowWindow {
    /// Fenwick tree storage (0-indexed API, heights as deltas).
    tree: Vec<isize>,
    len: usize,
}

impl RowWindow {
    /// Build a window over `rows` using the height table for `mode`.
    pub fn new(rows: &[VirtualRow], mode: LayoutMode) -> Self {
        let mut window = Self {
            tree: vec![0; rows.len().max(1)],
            len: 0,
        };
        for row in rows {
            let height = match mode {
                LayoutMode::Row => row_height(row.kind()),
                LayoutMode::Card => card_height(row.kind()),
            };
            window.push(height);
        }
        window
    }

    fn push(&mut self, height: u32) {
        if self.len >= self.tree.len() {
            self.tree.resize(self.tree.len().max(1) * 2, 0);
        }
        let index = self.len;
        self.len += 1;
        fenwick::array::update(&mut self.tree, index, height as isize);
    }

    /// Number of indexed rows.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window indexes no rows.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cumulative height up to and including `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    fn prefix_sum(&self, index: usize) -> u32 {
        assert!(
            index < self.len,
            "index {} out of bounds (len: {})",
            index,
            self.len
        );
        fenwick::array::prefix_sum(&self.tree, index).max(0) as u32
    }

    /// Top pixel offset of the row at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn offset_of(&self, index: usize) -> u32 {
        if index == 0 {
            0
        } else {
            self.prefix_sum(index - 1)
        }
    }

    /// Total pixel height of all indexed rows.
    pub fn total_height(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len - 1)
        }
    }

    /// Index of the row containing vertical offset `y`, or `None` past the
    /// end.
    pub fn row_at(&self, y: u32) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        // First index whose cumulative height exceeds y; row i covers
        // [prefix_sum(i-1), prefix_sum(i)).
        let mut left = 0;
        let mut right = self.len;
        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > y {
                right = mid;
            } else {
                left = mid + 1;
            }
        }
        (left < self.len).then_some(left)
    }

    /// Half-open index range of rows intersecting the viewport
    /// `[scroll, scroll + viewport)`.
    pub fn visible_range(&self, scroll: u32, viewport: u32) -> Range<usize> {
        if viewport == 0 || self.is_empty() {
            return 0..0;
        }
        let Some(start) = self.row_at(scroll) else {
            return self.len..self.len;
        };
        let last_visible_px = scroll.saturating_add(viewport) - 1;
        let end = match self.row_at(last_visible_px) {
            Some(last) => last + 1,
            None => self.len,
        };
        start..end
    }
}
