//! Controller construction options.

use super::fetcher::CancelTag;
use crate::model::TableId;
use crate::query::QueryMap;
use std::time::Duration;

/// Whether the controller mirrors its query into the external source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuerySync {
    /// Never read from or write to the query source after mount.
    #[default]
    Disabled,
    /// Keep the query source in two-way sync (URL reflects filters,
    /// external navigation re-derives them).
    Router,
}

/// Persisted-filter configuration, keyed by table id.
#[derive(Debug, Clone)]
pub struct PersistFilter {
    /// Store key scoping snapshots to one table.
    pub table_id: TableId,
    /// Keys stripped from every snapshot, unconditionally.
    pub exclude_keys: Vec<String>,
    /// Keys stripped only while their value still matches what the last
    /// external navigation injected. Once the user edits such a field to a
    /// different value it persists normally.
    pub transient_keys: Vec<String>,
}

impl PersistFilter {
    /// Persist for `table_id` with no exclusions.
    pub fn new(table_id: TableId) -> Self {
        Self {
            table_id,
            exclude_keys: Vec::new(),
            transient_keys: Vec::new(),
        }
    }
}

/// Options shaping one controller instance.
#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Query-source sync mode.
    pub query_sync: QuerySync,
    /// Persisted-filter configuration; `None` disables persistence.
    pub persist: Option<PersistFilter>,
    /// Debounce window between a state change and the fetch it causes.
    /// Zero means fetch without artificial delay.
    pub fetch_debounce: Duration,
    /// Cancel tag for last-request-wins fetch behavior.
    pub cancel_tag: Option<CancelTag>,
    /// Extra parameters merged into both the request payload and the
    /// mirrored query (and therefore subject to persistence exclusion).
    pub extra_params: QueryMap,
    /// Parameters mirrored into the query only, never sent to the fetcher.
    pub query_params_only: QueryMap,
    /// Parameters merged into the request payload only, never mirrored.
    pub request_params: QueryMap,
}
