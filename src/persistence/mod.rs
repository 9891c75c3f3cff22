//! Persisted filter snapshots, keyed by table identifier.
//!
//! The controller writes a sanitized query snapshot after every settled
//! fetch and reads one back exactly once, at mount, when the live query is
//! empty. Semantics are fire-and-forget: the controller logs store failures
//! and moves on.

pub mod file;

pub use file::JsonFileStore;

use crate::model::{StoreError, TableId};
use crate::query::QueryMap;
use std::collections::HashMap;

/// Per-table snapshot storage.
pub trait FilterStore {
    /// Replace the snapshot for `table`.
    fn save(&mut self, table: &TableId, snapshot: &QueryMap) -> Result<(), StoreError>;

    /// The most recent snapshot for `table`, if any.
    fn restore(&self, table: &TableId) -> Result<Option<QueryMap>, StoreError>;
}

/// In-memory [`FilterStore`] for tests and ephemeral embedding.
#[derive(Debug, Default)]
pub struct MemoryFilterStore {
    snapshots: HashMap<TableId, QueryMap>,
}

impl MemoryFilterStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FilterStore for MemoryFilterStore {
    fn save(&mut self, table: &TableId, snapshot: &QueryMap) -> Result<(), StoreError> {
        self.snapshots.insert(table.clone(), snapshot.clone());
        Ok(())
    }

    fn restore(&self, table: &TableId) -> Result<Option<QueryMap>, StoreError> {
        Ok(self.snapshots.get(table).cloned())
    }
}
