//! The external query-string source the controller mirrors itself into.
//!
//! The controller both writes the query (so the URL reflects current
//! filters) and reads it (to follow browser back/forward or another
//! component's navigation). Its own writes come back as change
//! notifications like any other navigation, so every push carries a
//! [`PushGeneration`]; the controller skips changes whose generation it
//! issued itself. A generation counter survives interleaved async writes,
//! which a transient boolean guard around the write call would not.

use super::QueryMap;
use std::collections::VecDeque;

/// Monotonic tag identifying one controller-originated query write.
pub type PushGeneration = u64;

/// One observed change of the query record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    /// The query record after the change.
    pub query: QueryMap,
    /// Generation of the push that caused this change, if the write came
    /// through [`QuerySource::push`]. `None` means genuine external
    /// navigation.
    pub origin: Option<PushGeneration>,
}

/// Reactive key-value record the controller keeps in two-way sync.
pub trait QuerySource {
    /// Current query record.
    fn current(&self) -> QueryMap;

    /// Write `query` as the new record, tagged with the pushing
    /// controller's generation.
    fn push(&mut self, query: QueryMap, generation: PushGeneration);

    /// Next unobserved change, oldest first. Self-originated writes are
    /// reported here too, carrying their generation.
    fn poll_change(&mut self) -> Option<RouteChange>;
}

/// In-memory [`QuerySource`] for tests and embedding without a router.
///
/// External navigation is simulated with [`MemoryQuerySource::navigate`];
/// pushes are logged so tests can assert what the controller wrote.
#[derive(Debug, Default)]
pub struct MemoryQuerySource {
    current: QueryMap,
    pending: VecDeque<RouteChange>,
    pushes: Vec<(PushGeneration, QueryMap)>,
}

impl MemoryQuerySource {
    /// Source starting with an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source starting at `query`, as if the page was opened on that URL.
    pub fn with_query(query: QueryMap) -> Self {
        Self {
            current: query,
            ..Self::default()
        }
    }

    /// Simulate an externally-driven navigation to `query`.
    pub fn navigate(&mut self, query: QueryMap) {
        self.current = query.clone();
        self.pending.push_back(RouteChange {
            query,
            origin: None,
        });
    }

    /// Every push observed so far, in order.
    pub fn pushes(&self) -> &[(PushGeneration, QueryMap)] {
        &self.pushes
    }
}

impl QuerySource for MemoryQuerySource {
    fn current(&self) -> QueryMap {
        self.current.clone()
    }

    fn push(&mut self, query: QueryMap, generation: PushGeneration) {
        self.current = query.clone();
        self.pushes.push((generation, query.clone()));
        // A real router fires its watcher for every write, own writes
        // included; the echo is what the generation tag exists to filter.
        self.pending.push_back(RouteChange {
            query,
            origin: Some(generation),
        });
    }

    fn poll_change(&mut self) -> Option<RouteChange> {
        self.pending.pop_front()
    }
}
