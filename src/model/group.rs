//! Event groups: top-level clusters one page of history is made of.

use super::event::GroupChild;
use super::identifiers::GroupId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A top-level event cluster, e.g. one blockchain transaction or one
/// exchange trade.
///
/// Groups are replaced wholesale whenever a page is re-fetched; they are
/// never mutated in place. Children load separately and may lag behind the
/// group list, which is why `grouped_events_num` exists: it sizes
/// placeholder rows before any child has arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventGroup {
    /// Unique key of this group.
    pub group_identifier: GroupId,
    /// Expected child count, if the backend reported one.
    pub grouped_events_num: Option<usize>,
    /// Timestamp of the group's underlying operation.
    pub timestamp: DateTime<Utc>,
    /// Location the group was recorded at (chain or exchange name).
    pub location: String,
}

/// Loaded children per group.
///
/// A missing key means the group's children have not loaded yet (the
/// planner renders placeholders); an empty `Vec` means the group loaded
/// with zero children and renders nothing below its header.
pub type EventsByGroup = HashMap<GroupId, Vec<GroupChild>>;
