//! Shared builders and doubles for tests.
//!
//! Compiled only under `cfg(test)`. Everything here favors brevity at call
//! sites: builders take plain strings and numbers, panic on bad input, and
//! fill fields tests rarely care about with fixed values.

use crate::controller::{CancelTag, PageFetcher};
use crate::model::{
    Collection, EntryType, EventGroup, EventId, EventSubtype, FetchError, GroupChild, GroupId,
    HistoryEvent, StoreError, TableId,
};
use crate::persistence::{FilterStore, MemoryFilterStore};
use crate::query::{
    FilterSchema, MemoryQuerySource, PushGeneration, QueryMap, QuerySource, QueryValue,
    RouteChange,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A `GroupId` from a literal; panics on empty input.
pub fn gid(raw: &str) -> GroupId {
    GroupId::new(raw).expect("test group ids are non-empty")
}

/// A fixed, arbitrary timestamp offset by `offset_secs`.
pub fn ts(offset_secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + offset_secs, 0)
        .single()
        .expect("in-range test timestamp")
}

/// A plain history event.
pub fn event(id: u64) -> HistoryEvent {
    HistoryEvent {
        identifier: EventId::new(id),
        entry_type: EntryType::EvmEvent,
        event_subtype: EventSubtype::None,
        timestamp: ts(id as i64),
        asset: "ETH".to_owned(),
        location: "ethereum".to_owned(),
    }
}

/// An event with an explicit entry type.
pub fn typed_event(id: u64, entry_type: EntryType) -> HistoryEvent {
    HistoryEvent {
        entry_type,
        ..event(id)
    }
}

/// An asset-movement event, the marker for matched-movement subgroups.
pub fn movement_event(id: u64) -> HistoryEvent {
    typed_event(id, EntryType::AssetMovementEvent)
}

/// A swap-leg event.
pub fn swap_event(id: u64, subtype: EventSubtype) -> HistoryEvent {
    HistoryEvent {
        event_subtype: subtype,
        ..typed_event(id, EntryType::EvmSwapEvent)
    }
}

/// A group with `expected` children reported by the backend.
pub fn group(id: &str, expected: usize) -> EventGroup {
    EventGroup {
        group_identifier: gid(id),
        grouped_events_num: Some(expected),
        timestamp: ts(0),
        location: "ethereum".to_owned(),
    }
}

/// `n` single-event children with sequential ids starting at `first_id`.
pub fn singles(first_id: u64, n: usize) -> Vec<GroupChild> {
    (0..n as u64)
        .map(|i| GroupChild::Single(event(first_id + i)))
        .collect()
}

/// A one-entry query record.
pub fn query1(key: &str, value: &str) -> QueryMap {
    let mut q = QueryMap::new();
    q.insert(key, QueryValue::single(value));
    q
}

// ===== Filter schema fixture =====

/// Typed filters of the history table fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilters {
    /// Location name, e.g. `kraken`. An empty string is invalid.
    pub location: Option<String>,
    /// Asset identifiers, any number.
    pub assets: Vec<String>,
    /// Transaction references, typically injected by navigation.
    pub tx_refs: Vec<String>,
}

/// Schema mapping [`HistoryFilters`] onto `location`/`asset`/`txRef` keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistorySchema;

impl FilterSchema for HistorySchema {
    type Filters = HistoryFilters;

    fn encode(filters: &HistoryFilters) -> QueryMap {
        let mut query = QueryMap::new();
        if let Some(location) = &filters.location {
            query.insert("location", QueryValue::single(location.clone()));
        }
        if !filters.assets.is_empty() {
            query.insert("asset", QueryValue::multi(filters.assets.clone()));
        }
        if !filters.tx_refs.is_empty() {
            query.insert("txRef", QueryValue::multi(filters.tx_refs.clone()));
        }
        query
    }

    fn decode(query: &QueryMap) -> Result<HistoryFilters, crate::model::ValidationError> {
        let location = match query.get("location") {
            Some(value) => {
                let raw = value
                    .as_single()
                    .ok_or_else(|| {
                        crate::model::ValidationError::new("location", "expected a single value")
                    })?
                    .to_owned();
                if raw.is_empty() {
                    return Err(crate::model::ValidationError::new(
                        "location",
                        "must not be empty",
                    ));
                }
                Some(raw)
            }
            None => None,
        };
        let strings = |key: &str| {
            query
                .get(key)
                .map(|v| v.as_strings().into_iter().map(str::to_owned).collect())
                .unwrap_or_default()
        };
        Ok(HistoryFilters {
            location,
            assets: strings("asset"),
            tx_refs: strings("txRef"),
        })
    }
}

// ===== Mock fetcher =====

/// One observed call against a [`MockFetcher`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetcherCall {
    /// `cancel` was invoked with this tag.
    Cancel(CancelTag),
    /// `fetch` was invoked with this payload.
    Fetch(QueryMap),
}

struct Scripted {
    latency: Option<Duration>,
    result: Result<Collection<EventGroup>, FetchError>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<FetcherCall>,
    script: VecDeque<Scripted>,
}

/// Scriptable [`PageFetcher`] recording every call.
///
/// Each `fetch` pops the next scripted response; an exhausted script yields
/// an empty page. Latencies run on tokio's (pausable) clock, so tests with
/// `start_paused` stay deterministic.
#[derive(Clone, Default)]
pub struct MockFetcher {
    state: Arc<Mutex<MockState>>,
}

impl MockFetcher {
    /// Fetcher with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate response.
    pub fn respond(&self, result: Result<Collection<EventGroup>, FetchError>) {
        self.push(None, result);
    }

    /// Queue a response that arrives after `latency`.
    pub fn respond_after(
        &self,
        latency: Duration,
        result: Result<Collection<EventGroup>, FetchError>,
    ) {
        self.push(Some(latency), result);
    }

    fn push(&self, latency: Option<Duration>, result: Result<Collection<EventGroup>, FetchError>) {
        self.state
            .lock()
            .expect("mock fetcher lock")
            .script
            .push_back(Scripted { latency, result });
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<FetcherCall> {
        self.state.lock().expect("mock fetcher lock").calls.clone()
    }

    /// Payloads of the `fetch` calls observed so far, in order.
    pub fn fetch_payloads(&self) -> Vec<QueryMap> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                FetcherCall::Fetch(payload) => Some(payload),
                FetcherCall::Cancel(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl PageFetcher<EventGroup> for MockFetcher {
    async fn fetch(&self, payload: QueryMap) -> Result<Collection<EventGroup>, FetchError> {
        let scripted = {
            let mut state = self.state.lock().expect("mock fetcher lock");
            state.calls.push(FetcherCall::Fetch(payload));
            state.script.pop_front()
        };
        match scripted {
            Some(Scripted { latency, result }) => {
                if let Some(latency) = latency {
                    tokio::time::sleep(latency).await;
                }
                result
            }
            None => Ok(Collection::default()),
        }
    }

    fn cancel(&self, tag: &CancelTag) {
        self.state
            .lock()
            .expect("mock fetcher lock")
            .calls
            .push(FetcherCall::Cancel(tag.clone()));
    }
}

// ===== Shared-handle doubles =====
//
// The controller takes its query source and filter store by ownership;
// these wrappers let a test keep a handle for driving navigation and
// inspecting what was written.

/// Cloneable handle around a [`MemoryQuerySource`].
#[derive(Clone, Default)]
pub struct SharedQuerySource(Arc<Mutex<MemoryQuerySource>>);

impl SharedQuerySource {
    /// Source starting with an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source starting at `query`.
    pub fn with_query(query: QueryMap) -> Self {
        Self(Arc::new(Mutex::new(MemoryQuerySource::with_query(query))))
    }

    /// Simulate external navigation to `query`.
    pub fn navigate(&self, query: QueryMap) {
        self.0.lock().expect("query source lock").navigate(query);
    }

    /// Every push observed so far.
    pub fn pushes(&self) -> Vec<(PushGeneration, QueryMap)> {
        self.0.lock().expect("query source lock").pushes().to_vec()
    }
}

impl QuerySource for SharedQuerySource {
    fn current(&self) -> QueryMap {
        self.0.lock().expect("query source lock").current()
    }

    fn push(&mut self, query: QueryMap, generation: PushGeneration) {
        self.0
            .lock()
            .expect("query source lock")
            .push(query, generation);
    }

    fn poll_change(&mut self) -> Option<RouteChange> {
        self.0.lock().expect("query source lock").poll_change()
    }
}

/// Cloneable handle around a [`MemoryFilterStore`].
#[derive(Clone, Default)]
pub struct SharedFilterStore(Arc<Mutex<MemoryFilterStore>>);

impl SharedFilterStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a snapshot, as if persisted by an earlier session.
    pub fn seed(&self, table: &TableId, snapshot: QueryMap) {
        self.0
            .lock()
            .expect("filter store lock")
            .save(table, &snapshot)
            .expect("memory store save is infallible");
    }

    /// The snapshot currently stored for `table`.
    pub fn snapshot(&self, table: &TableId) -> Option<QueryMap> {
        self.0
            .lock()
            .expect("filter store lock")
            .restore(table)
            .expect("memory store restore is infallible")
    }
}

impl FilterStore for SharedFilterStore {
    fn save(&mut self, table: &TableId, snapshot: &QueryMap) -> Result<(), StoreError> {
        self.0
            .lock()
            .expect("filter store lock")
            .save(table, snapshot)
    }

    fn restore(&self, table: &TableId) -> Result<Option<QueryMap>, StoreError> {
        self.0.lock().expect("filter store lock").restore(table)
    }
}

/// A page collection whose `found`/`total` match the data length.
pub fn page_of(groups: Vec<EventGroup>) -> Collection<EventGroup> {
    let found = groups.len();
    Collection {
        data: groups,
        found,
        limit: 10,
        total: found,
    }
}
