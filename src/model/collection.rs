//! Paginated collection envelope returned by page fetches.

use serde::{Deserialize, Serialize};

/// One page of results plus the counts the backend reports for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<T> {
    /// Entries of the current page.
    pub data: Vec<T>,
    /// Number of entries matching the active filters.
    pub found: usize,
    /// Page size the backend applied.
    pub limit: usize,
    /// Total number of entries ignoring filters.
    pub total: usize,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            found: 0,
            limit: 0,
            total: 0,
        }
    }
}

impl<T> Collection<T> {
    /// Whether this page carries no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
