//! End-to-end test of the public API: a table surface wiring its own
//! schema and fetcher into the view, driving filters, pagination and row
//! expansion the way an embedding application would.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use histview::controller::{
    CancelTag, ControllerOptions, PageFetcher, PaginatedFilterController, Sort,
};
use histview::model::{
    Collection, EntryType, EventGroup, EventId, EventSubtype, FetchError, GroupChild, GroupId,
    HistoryEvent, SubgroupKey, ValidationError,
};
use histview::query::{FilterSchema, MemoryQuerySource, QueryMap, QueryValue};
use histview::rows::{LayoutMode, RowKind};
use histview::view::HistoryEventsView;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default, PartialEq)]
struct LocationFilters {
    location: Option<String>,
}

struct LocationSchema;

impl FilterSchema for LocationSchema {
    type Filters = LocationFilters;

    fn encode(filters: &LocationFilters) -> QueryMap {
        let mut query = QueryMap::new();
        if let Some(location) = &filters.location {
            query.insert("location", QueryValue::single(location.clone()));
        }
        query
    }

    fn decode(query: &QueryMap) -> Result<LocationFilters, ValidationError> {
        Ok(LocationFilters {
            location: query
                .get("location")
                .and_then(QueryValue::as_single)
                .map(str::to_owned),
        })
    }
}

fn ts(offset: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + offset, 0)
        .single()
        .expect("in-range timestamp")
}

fn group(id: &str, expected: usize) -> EventGroup {
    EventGroup {
        group_identifier: GroupId::new(id).expect("valid group id"),
        grouped_events_num: Some(expected),
        timestamp: ts(0),
        location: "ethereum".to_owned(),
    }
}

fn event(id: u64, entry_type: EntryType) -> HistoryEvent {
    HistoryEvent {
        identifier: EventId::new(id),
        entry_type,
        event_subtype: EventSubtype::None,
        timestamp: ts(id as i64),
        asset: "ETH".to_owned(),
        location: "ethereum".to_owned(),
    }
}

/// Fetcher serving a fixed dataset, filtered by location and paginated by
/// the payload it receives.
struct FixtureFetcher {
    groups: Vec<(EventGroup, String)>,
    payloads: Arc<Mutex<Vec<QueryMap>>>,
}

impl FixtureFetcher {
    fn new(groups: Vec<(EventGroup, String)>) -> Self {
        Self {
            groups,
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl PageFetcher<EventGroup> for FixtureFetcher {
    async fn fetch(&self, payload: QueryMap) -> Result<Collection<EventGroup>, FetchError> {
        self.payloads
            .lock()
            .expect("payload lock")
            .push(payload.clone());

        let location = payload.get("location").and_then(QueryValue::as_single);
        let matching: Vec<EventGroup> = self
            .groups
            .iter()
            .filter(|(_, loc)| location.is_none_or(|wanted| wanted == loc.as_str()))
            .map(|(g, _)| g.clone())
            .collect();

        let limit: usize = payload
            .get("limit")
            .and_then(QueryValue::as_single)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(10);
        let page: usize = payload
            .get("page")
            .and_then(QueryValue::as_single)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(1);

        let found = matching.len();
        let data = matching
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();
        Ok(Collection {
            data,
            found,
            limit,
            total: self.groups.len(),
        })
    }

    fn cancel(&self, _tag: &CancelTag) {}
}

fn fixture() -> FixtureFetcher {
    FixtureFetcher::new(vec![
        (group("eth-1", 2), "ethereum".to_owned()),
        (group("kraken-1", 1), "kraken".to_owned()),
        (group("eth-2", 1), "ethereum".to_owned()),
    ])
}

fn build_view(fetcher: FixtureFetcher) -> HistoryEventsView<LocationSchema, FixtureFetcher> {
    let controller = PaginatedFilterController::new(
        fetcher,
        Box::new(MemoryQuerySource::new()),
        None,
        ControllerOptions::default(),
    );
    HistoryEventsView::new(controller)
}

#[tokio::test]
async fn filtering_reshapes_the_rendered_rows() {
    let mut view = build_view(fixture());
    view.settle().await;
    assert_eq!(view.controller().state().data.len(), 3);

    view.controller_mut()
        .set_query_filters(&{
            let mut q = QueryMap::new();
            q.insert("location", QueryValue::single("kraken"));
            q
        })
        .expect("valid filter");
    view.settle().await;

    let rows = view.rows();
    assert_eq!(rows.len(), 2, "one group: header plus one placeholder");
    assert_eq!(rows[0].group_id().as_str(), "kraken-1");
}

#[tokio::test]
async fn children_arriving_later_replace_placeholders_in_place() {
    let mut view = build_view(fixture());
    view.settle().await;

    let before = view.rows();
    let placeholder_count = before
        .iter()
        .filter(|r| r.kind() == RowKind::Placeholder)
        .count();
    assert_eq!(placeholder_count, 4, "2 + 1 + 1 expected children");

    let pending: Vec<GroupId> = view.pending_groups().into_iter().cloned().collect();
    for group_id in pending {
        view.set_group_events(
            group_id,
            vec![GroupChild::Single(event(1, EntryType::EvmEvent))],
        );
    }

    let after = view.rows();
    assert!(after.iter().all(|r| r.kind() != RowKind::Placeholder));
    // Row count can shrink: real child counts override the estimates.
    assert_eq!(
        after.iter().filter(|r| r.kind() == RowKind::Event).count(),
        3
    );
}

#[tokio::test]
async fn swap_expansion_changes_window_geometry() {
    let mut view = build_view(FixtureFetcher::new(vec![(
        group("g1", 1),
        "ethereum".to_owned(),
    )]));
    view.settle().await;
    view.set_group_events(
        GroupId::new("g1").expect("valid group id"),
        vec![GroupChild::Subgroup(vec![
            event(1, EntryType::EvmSwapEvent),
            event(2, EntryType::EvmSwapEvent),
        ])],
    );

    let collapsed = view.window(LayoutMode::Row);
    let key = SubgroupKey::new(GroupId::new("g1").expect("valid group id"), 0);
    assert!(view.toggle_swap_expanded(key));
    let expanded = view.window(LayoutMode::Row);

    assert!(
        expanded.total_height() > collapsed.total_height(),
        "exploding a swap adds rows"
    );
    assert_eq!(expanded.len(), collapsed.len() + 2);
}

#[tokio::test]
async fn sorting_and_paging_round_trip_through_the_fetcher() {
    let fetcher = fixture();
    let payloads = Arc::clone(&fetcher.payloads);
    let mut view = build_view(fetcher);
    view.settle().await;

    view.controller_mut().set_limit(2);
    view.controller_mut()
        .set_sort(Some(Sort::descending("timestamp")));
    view.settle().await;

    let recorded = payloads.lock().expect("payload lock");
    let last = recorded.last().expect("at least one fetch");
    assert_eq!(last.get("limit").and_then(QueryValue::as_single), Some("2"));
    assert_eq!(
        last.get("sortDir").and_then(QueryValue::as_single),
        Some("desc")
    );
    drop(recorded);

    assert_eq!(view.controller().state().data.len(), 2, "page size applied");
    assert_eq!(view.controller().state().found, 3);
}
