//! The paginated filter controller.
//!
//! Owns filter, sort and pagination state for one table; debounces and
//! deduplicates the fetches they cause; mirrors itself into the external
//! query source under a self-push guard; and persists sanitized snapshots
//! per table id.
//!
//! # Fetch lifecycle
//!
//! Any state change marks the controller dirty (`Debouncing`). Waiting out
//! the debounce window and issuing the fetch happens in [`settle`]; because
//! all changes land before the window is measured, consecutive changes
//! coalesce into exactly one fetch reflecting their final combined state.
//! Issued fetches run as spawned tasks reporting back over a channel, so an
//! older request can still be in flight when a newer one settles: results
//! are gated on their fetch sequence number and stale ones are dropped,
//! whatever order they arrive in. Completion order is never trusted.
//!
//! [`settle`]: PaginatedFilterController::settle

use super::fetcher::PageFetcher;
use super::options::{ControllerOptions, QuerySync};
use super::pagination::{Pagination, Sort};
use crate::model::{Collection, FetchError, ValidationError};
use crate::persistence::FilterStore;
use crate::query::{FilterSchema, PushGeneration, QueryMap, QuerySource};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Where the controller currently is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// No pending change and no request in flight.
    Idle,
    /// A change occurred; its fetch has not been issued yet.
    Debouncing,
    /// A request is in flight.
    Fetching,
}

type FetchResult<T> = (u64, Result<Collection<T>, FetchError>);

/// Paginated filter state bound to an injected fetcher, query source and
/// snapshot store.
///
/// `T` is the page entry type, `S` the filter schema, `F` the fetcher.
pub struct PaginatedFilterController<T, S: FilterSchema, F> {
    fetcher: Arc<F>,
    source: Box<dyn QuerySource>,
    store: Option<Box<dyn FilterStore>>,
    options: ControllerOptions,

    filters: S::Filters,
    sort: Option<Sort>,
    pagination: Pagination,
    state: Collection<T>,

    // Change tracking: dirty_gen counts state changes, issued_gen/settled_gen
    // record which change generation the last fetch was issued for and which
    // one last settled.
    dirty_gen: u64,
    issued_gen: u64,
    settled_gen: u64,

    // Fetch sequencing: results only apply while their sequence number is
    // still the newest issued one.
    fetch_seq: u64,
    in_flight: Option<u64>,
    results_tx: mpsc::UnboundedSender<FetchResult<T>>,
    results_rx: mpsc::UnboundedReceiver<FetchResult<T>>,

    // Self-push guard: generations of our own query writes, removed when
    // their echo is observed. Generations are issued and echoed in order,
    // so observing an echo also retires everything older than it; a source
    // that coalesces changes cannot grow the set without bound.
    next_push_gen: PushGeneration,
    issued_pushes: HashSet<PushGeneration>,

    // Last values external navigation injected for transient keys.
    last_nav_values: QueryMap,
}

impl<T, S, F> PaginatedFilterController<T, S, F>
where
    T: Send + 'static,
    S: FilterSchema,
    F: PageFetcher<T> + 'static,
{
    /// Build a controller and derive its initial state.
    ///
    /// If the live query is non-empty the URL wins: filters, pagination and
    /// sort come from it and persisted restoration is skipped. Otherwise
    /// the most recent persisted snapshot for the configured table id (if
    /// any) is applied. Either way the controller starts dirty, so the
    /// first [`settle`](Self::settle) performs the initial fetch.
    pub fn new(
        fetcher: F,
        source: Box<dyn QuerySource>,
        store: Option<Box<dyn FilterStore>>,
        options: ControllerOptions,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            fetcher: Arc::new(fetcher),
            source,
            store,
            options,
            filters: S::Filters::default(),
            sort: None,
            pagination: Pagination::default(),
            state: Collection::default(),
            dirty_gen: 0,
            issued_gen: 0,
            settled_gen: 0,
            fetch_seq: 0,
            in_flight: None,
            results_tx,
            results_rx,
            next_push_gen: 0,
            issued_pushes: HashSet::new(),
            last_nav_values: QueryMap::new(),
        };
        controller.mount();
        controller
    }

    fn mount(&mut self) {
        let live = self.source.current();
        if !live.is_empty() {
            tracing::debug!("initial query present, skipping persisted restore");
            self.apply_navigation(live);
            return;
        }
        let restored = self.restore_snapshot();
        if let Some(snapshot) = restored {
            match S::decode(&snapshot) {
                Ok(filters) => self.filters = filters,
                Err(error) => {
                    tracing::warn!(%error, "persisted snapshot failed filter validation");
                }
            }
            if let Some(pagination) = Pagination::read_query(&snapshot) {
                self.pagination = pagination;
            }
            if let Some(sort) = Sort::read_query(&snapshot) {
                self.sort = Some(sort);
            }
        }
        self.touch();
    }

    fn restore_snapshot(&mut self) -> Option<QueryMap> {
        let persist = self.options.persist.as_ref()?;
        let store = self.store.as_ref()?;
        match store.restore(&persist.table_id) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, table = %persist.table_id, "filter restore failed");
                None
            }
        }
    }

    // ===== Reactive state accessors =====

    /// Current typed filters.
    pub fn filters(&self) -> &S::Filters {
        &self.filters
    }

    /// Current sort, if any.
    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    /// Current pagination.
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Last successfully settled page, or the empty default.
    pub fn state(&self) -> &Collection<T> {
        &self.state
    }

    /// How many of our own query writes still await their echo.
    #[cfg(test)]
    pub(crate) fn pending_push_guards(&self) -> usize {
        self.issued_pushes.len()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ControllerPhase {
        if self.in_flight.is_some() {
            ControllerPhase::Fetching
        } else if self.dirty_gen > self.settled_gen {
            ControllerPhase::Debouncing
        } else {
            ControllerPhase::Idle
        }
    }

    // ===== Mutators =====

    fn touch(&mut self) {
        self.dirty_gen += 1;
    }

    /// Replace the typed filters. Resets to the first page. No-op when the
    /// value is unchanged, so redundant edits cause no fetch.
    pub fn set_filters(&mut self, filters: S::Filters) {
        if filters == self.filters {
            return;
        }
        self.filters = filters;
        self.pagination.page = 1;
        self.touch();
    }

    /// Decode and apply filters from raw query form.
    ///
    /// On validation failure the current filters stay untouched, no fetch
    /// is scheduled, and the error is returned for the caller to surface.
    pub fn set_query_filters(&mut self, query: &QueryMap) -> Result<(), ValidationError> {
        let filters = S::decode(query)?;
        self.set_filters(filters);
        Ok(())
    }

    /// Replace the sort.
    pub fn set_sort(&mut self, sort: Option<Sort>) {
        if sort == self.sort {
            return;
        }
        self.sort = sort;
        self.touch();
    }

    /// Jump to `page` (1-based).
    pub fn set_page(&mut self, page: usize) {
        let page = page.max(1);
        if page == self.pagination.page {
            return;
        }
        self.pagination.page = page;
        self.touch();
    }

    /// Change the page size. Resets to the first page.
    pub fn set_limit(&mut self, limit: usize) {
        let limit = limit.max(1);
        if limit == self.pagination.limit {
            return;
        }
        self.pagination = Pagination { page: 1, limit };
        self.touch();
    }

    // ===== Query mirroring =====

    /// The full query record describing current state: encoded filters,
    /// pagination, sort, extra params and query-only params.
    pub fn current_query(&self) -> QueryMap {
        let mut query = S::encode(&self.filters);
        self.pagination.write_query(&mut query);
        if let Some(sort) = &self.sort {
            sort.write_query(&mut query);
        }
        query.merge(&self.options.extra_params);
        query.merge(&self.options.query_params_only);
        query
    }

    /// The payload handed to the fetcher: encoded filters, pagination,
    /// sort, extra params and request-only params.
    pub fn request_payload(&self) -> QueryMap {
        let mut payload = S::encode(&self.filters);
        self.pagination.write_query(&mut payload);
        if let Some(sort) = &self.sort {
            sort.write_query(&mut payload);
        }
        payload.merge(&self.options.extra_params);
        payload.merge(&self.options.request_params);
        payload
    }

    /// Drain pending query-source changes.
    ///
    /// Echoes of the controller's own pushes are identified by their
    /// generation and skipped; anything else is genuine external navigation
    /// and re-derives filters, pagination and sort from the query.
    pub fn poll_routes(&mut self) {
        if self.options.query_sync != QuerySync::Router {
            return;
        }
        while let Some(change) = self.source.poll_change() {
            match change.origin {
                Some(generation) if self.issued_pushes.remove(&generation) => {
                    // Older pushes can no longer echo once a newer one has;
                    // drop their guards along with this one.
                    self.issued_pushes.retain(|&g| g > generation);
                    tracing::trace!(generation, "skipping echo of own query write");
                }
                _ => self.apply_navigation(change.query),
            }
        }
    }

    fn apply_navigation(&mut self, query: QueryMap) {
        if query.is_empty() {
            // A navigation that clears the query resets everything,
            // including the transient-key memory.
            self.last_nav_values = QueryMap::new();
            self.filters = S::Filters::default();
            self.pagination = Pagination::default();
            self.sort = None;
            self.touch();
            return;
        }

        self.remember_nav_transients(&query);
        match S::decode(&query) {
            Ok(filters) => self.filters = filters,
            Err(error) => {
                tracing::warn!(%error, "navigation carried invalid filter values");
            }
        }
        if let Some(pagination) = Pagination::read_query(&query) {
            self.pagination = pagination;
        }
        if let Some(sort) = Sort::read_query(&query) {
            self.sort = Some(sort);
        }
        self.touch();
    }

    fn remember_nav_transients(&mut self, query: &QueryMap) {
        let Some(persist) = &self.options.persist else {
            return;
        };
        for key in &persist.transient_keys {
            if let Some(value) = query.get(key) {
                self.last_nav_values.insert(key.clone(), value.clone());
            }
        }
    }

    fn push_query(&mut self) {
        if self.options.query_sync != QuerySync::Router {
            return;
        }
        let query = self.current_query();
        if query == self.source.current() {
            return;
        }
        self.next_push_gen += 1;
        let generation = self.next_push_gen;
        self.issued_pushes.insert(generation);
        self.source.push(query, generation);
    }

    // ===== Fetching =====

    /// Issue a fetch for the current state immediately, without debounce.
    ///
    /// Cancels any outstanding request sharing the configured cancel tag
    /// first, then spawns the fetch. The result is applied by
    /// [`settle`](Self::settle) or [`poll_results`](Self::poll_results).
    pub fn trigger_fetch(&mut self) {
        self.issued_gen = self.dirty_gen;
        self.fetch_seq += 1;
        let seq = self.fetch_seq;
        self.in_flight = Some(seq);

        self.push_query();

        if seq > 1 {
            if let Some(tag) = &self.options.cancel_tag {
                tracing::debug!(%tag, "cancelling outstanding request");
                self.fetcher.cancel(tag);
            }
        }

        let payload = self.request_payload();
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.results_tx.clone();
        tracing::debug!(seq, "issuing page fetch");
        tokio::spawn(async move {
            let result = fetcher.fetch(payload).await;
            // Receiver dropped means the controller is gone; nothing to do.
            let _ = tx.send((seq, result));
        });
    }

    /// Apply any fetch results that have already arrived, without waiting.
    pub fn poll_results(&mut self) {
        while let Ok((seq, result)) = self.results_rx.try_recv() {
            self.apply_result(seq, result);
        }
    }

    fn apply_result(&mut self, seq: u64, result: Result<Collection<T>, FetchError>) {
        if seq != self.fetch_seq {
            // A newer request was issued after this one; whatever this
            // result says, it no longer describes current state.
            tracing::trace!(seq, current = self.fetch_seq, "dropping stale fetch result");
            return;
        }
        self.in_flight = None;
        self.settled_gen = self.issued_gen;
        match result {
            Ok(collection) => {
                tracing::debug!(seq, entries = collection.data.len(), "fetch settled");
                self.state = collection;
                self.persist_snapshot();
            }
            Err(FetchError::Cancelled) => {
                tracing::trace!(seq, "fetch cancelled");
            }
            Err(error) => {
                // Previous state stays intact; the caller decides what to
                // surface. No automatic retry.
                tracing::warn!(seq, %error, "fetch failed");
            }
        }
    }

    /// Drive the controller until idle: wait out the debounce window,
    /// issue the pending fetch, and apply results until the newest request
    /// settles.
    pub async fn settle(&mut self) {
        self.poll_routes();
        loop {
            self.poll_results();
            match self.phase() {
                ControllerPhase::Idle => return,
                ControllerPhase::Debouncing => {
                    let debounce = self.options.fetch_debounce;
                    if !debounce.is_zero() {
                        let observed = self.dirty_gen;
                        tokio::time::sleep(debounce).await;
                        if self.dirty_gen != observed {
                            // Another change landed inside the window;
                            // restart it so the fetch reflects final state.
                            continue;
                        }
                    }
                    self.trigger_fetch();
                }
                ControllerPhase::Fetching => {
                    match self.results_rx.recv().await {
                        Some((seq, result)) => self.apply_result(seq, result),
                        // We hold a sender, so the channel cannot close.
                        None => return,
                    }
                }
            }
        }
    }

    /// Manual refresh: fetch current state now and wait for it to settle.
    pub async fn fetch_data(&mut self) {
        self.poll_routes();
        self.trigger_fetch();
        while self.in_flight.is_some() {
            match self.results_rx.recv().await {
                Some((seq, result)) => self.apply_result(seq, result),
                None => return,
            }
        }
    }

    // ===== Persistence =====

    fn persist_snapshot(&mut self) {
        let Some(persist) = self.options.persist.clone() else {
            return;
        };
        let mut snapshot = self.current_query();
        for key in &persist.exclude_keys {
            snapshot.remove(key);
        }
        for key in &persist.transient_keys {
            // Compare by carried strings: navigation may inject a single
            // value where the schema re-encodes a one-element list.
            let unchanged_since_nav = match (snapshot.get(key), self.last_nav_values.get(key)) {
                (Some(current), Some(injected)) => current.as_strings() == injected.as_strings(),
                _ => false,
            };
            if unchanged_since_nav {
                snapshot.remove(key);
            }
        }
        if let Some(store) = self.store.as_mut() {
            if let Err(error) = store.save(&persist.table_id, &snapshot) {
                tracing::warn!(%error, table = %persist.table_id, "filter persist failed");
            }
        }
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "paginated_tests.rs"]
mod tests;
