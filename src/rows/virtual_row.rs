//! The typed virtual rows a renderer walks over.

use crate::model::{GroupId, HistoryEvent, RowKey, SubgroupKey};

/// Kind of a virtual row, used to key the constant height tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    /// Header row opening a group.
    GroupHeader,
    /// A single event.
    Event,
    /// Placeholder for an event whose data has not loaded yet.
    Placeholder,
    /// Collapsed swap subgroup summarized in one row.
    Swap,
    /// Collapse affordance above an expanded swap subgroup.
    SwapCollapse,
    /// Collapsed matched-movement subgroup summarized in one row.
    MatchedMovement,
    /// Collapse affordance above an expanded matched-movement subgroup.
    MatchedMovementCollapse,
    /// Sentinel offering to reveal a group's hidden children.
    LoadMore,
}

/// One row of the flattened history table.
///
/// Every variant carries the `GroupId` it belongs to, making each row
/// independently renderable, measurable and diffable. Within a group the
/// order is always: header, then events/placeholders (with subgroups either
/// summarized or exploded), then an optional load-more sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum VirtualRow {
    /// Header row opening a group.
    GroupHeader {
        /// The group this header opens.
        group_id: GroupId,
    },
    /// A single event row, either a top-level child or one exploded out of
    /// an expanded subgroup (distinguished by the key's `sub_index`).
    Event {
        /// Owning group.
        group_id: GroupId,
        /// Position of this row within the group.
        key: RowKey,
        /// The event to render.
        event: HistoryEvent,
    },
    /// Placeholder sized in before the group's children have loaded.
    Placeholder {
        /// Owning group.
        group_id: GroupId,
        /// Position of this placeholder within the group.
        key: RowKey,
    },
    /// Collapsed swap subgroup carrying its full event list for rendering
    /// and highlighting downstream.
    Swap {
        /// Owning group.
        group_id: GroupId,
        /// Identity of the subgroup.
        key: SubgroupKey,
        /// All events of the swap.
        events: Vec<HistoryEvent>,
    },
    /// Collapse-back affordance shown above an expanded swap's rows.
    SwapCollapse {
        /// Owning group.
        group_id: GroupId,
        /// Identity of the subgroup.
        key: SubgroupKey,
        /// Number of rows the expansion revealed.
        count: usize,
    },
    /// Collapsed matched cross-location movement pair.
    MatchedMovement {
        /// Owning group.
        group_id: GroupId,
        /// Identity of the subgroup.
        key: SubgroupKey,
        /// All events of the matched movement.
        events: Vec<HistoryEvent>,
    },
    /// Collapse-back affordance shown above an expanded movement's rows.
    MatchedMovementCollapse {
        /// Owning group.
        group_id: GroupId,
        /// Identity of the subgroup.
        key: SubgroupKey,
        /// Number of rows the expansion revealed.
        count: usize,
    },
    /// Sentinel revealing that the group has more children than the current
    /// visible limit.
    LoadMore {
        /// Owning group.
        group_id: GroupId,
        /// Children currently hidden by the limit.
        hidden_count: usize,
        /// Total direct children of the group.
        total_count: usize,
    },
}

impl VirtualRow {
    /// The group this row is attributed to.
    pub fn group_id(&self) -> &GroupId {
        match self {
            VirtualRow::GroupHeader { group_id }
            | VirtualRow::Event { group_id, .. }
            | VirtualRow::Placeholder { group_id, .. }
            | VirtualRow::Swap { group_id, .. }
            | VirtualRow::SwapCollapse { group_id, .. }
            | VirtualRow::MatchedMovement { group_id, .. }
            | VirtualRow::MatchedMovementCollapse { group_id, .. }
            | VirtualRow::LoadMore { group_id, .. } => group_id,
        }
    }

    /// The row's kind, for height lookups.
    pub fn kind(&self) -> RowKind {
        match self {
            VirtualRow::GroupHeader { .. } => RowKind::GroupHeader,
            VirtualRow::Event { .. } => RowKind::Event,
            VirtualRow::Placeholder { .. } => RowKind::Placeholder,
            VirtualRow::Swap { .. } => RowKind::Swap,
            VirtualRow::SwapCollapse { .. } => RowKind::SwapCollapse,
            VirtualRow::MatchedMovement { .. } => RowKind::MatchedMovement,
            VirtualRow::MatchedMovementCollapse { .. } => RowKind::MatchedMovementCollapse,
            VirtualRow::LoadMore { .. } => RowKind::LoadMore,
        }
    }
}
