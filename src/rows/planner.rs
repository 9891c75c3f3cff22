//! The row planner: flattens grouped events into renderable virtual rows.
//!
//! Flattening is a pure function of the group list, the loaded children and
//! the planner's own expansion/limit state: recomputing with the same
//! inputs yields an element-wise equal row sequence. The planner performs
//! no I/O and never panics on malformed input; an unclassifiable subgroup
//! degrades to a collapsed swap.

use super::virtual_row::VirtualRow;
use crate::model::{EventGroup, EventsByGroup, GroupChild, GroupId, HistoryEvent, RowKey, SubgroupKey};
use std::collections::{HashMap, HashSet};

/// Default number of a group's children shown before a load-more sentinel.
pub const INITIAL_VISIBLE_EVENTS: usize = 6;

/// How many more children each "load more" reveals.
pub const VISIBLE_EVENTS_STEP: usize = 6;

/// How a nested subgroup renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubgroupKind {
    Swap,
    MatchedMovement,
}

/// Flattens event groups into a virtual row sequence and owns the local
/// view state that shapes it: per-group visible counts and the two
/// independent expansion sets.
///
/// All mutable state is instance-owned and changed only through the
/// planner's own actions, so several tables on one page never interfere.
#[derive(Debug, Clone)]
pub struct RowPlanner {
    initial_limit: usize,
    step: usize,
    visible_counts: HashMap<GroupId, usize>,
    expanded_swaps: HashSet<SubgroupKey>,
    expanded_movements: HashSet<SubgroupKey>,
}

impl Default for RowPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RowPlanner {
    /// Planner with the default visible limit and step.
    pub fn new() -> Self {
        Self::with_limits(INITIAL_VISIBLE_EVENTS, VISIBLE_EVENTS_STEP)
    }

    /// Planner with explicit visible limit and load-more step.
    ///
    /// A zero `initial_limit` or `step` is bumped to 1 so load-more always
    /// makes progress.
    pub fn with_limits(initial_limit: usize, step: usize) -> Self {
        Self {
            initial_limit: initial_limit.max(1),
            step: step.max(1),
            visible_counts: HashMap::new(),
            expanded_swaps: HashSet::new(),
            expanded_movements: HashSet::new(),
        }
    }

    /// Current visible limit for `group`.
    pub fn visible_count(&self, group: &GroupId) -> usize {
        self.visible_counts
            .get(group)
            .copied()
            .unwrap_or(self.initial_limit)
    }

    /// Reveal one more step of `group`'s children.
    ///
    /// Monotonic: the count only grows. There is no cap; the slice over the
    /// group's actual children bounds what renders.
    pub fn load_more(&mut self, group: &GroupId) {
        let next = self.visible_count(group) + self.step;
        self.visible_counts.insert(group.clone(), next);
    }

    /// Flip whether the swap subgroup at `key` renders exploded.
    /// Returns the new expanded state.
    pub fn toggle_swap_expanded(&mut self, key: SubgroupKey) -> bool {
        if self.expanded_swaps.remove(&key) {
            false
        } else {
            self.expanded_swaps.insert(key);
            true
        }
    }

    /// Flip whether the matched-movement subgroup at `key` renders
    /// exploded. Returns the new expanded state.
    pub fn toggle_movement_expanded(&mut self, key: SubgroupKey) -> bool {
        if self.expanded_movements.remove(&key) {
            false
        } else {
            self.expanded_movements.insert(key);
            true
        }
    }

    /// Whether the swap subgroup at `key` is currently expanded.
    pub fn is_swap_expanded(&self, key: &SubgroupKey) -> bool {
        self.expanded_swaps.contains(key)
    }

    /// Whether the matched-movement subgroup at `key` is currently expanded.
    pub fn is_movement_expanded(&self, key: &SubgroupKey) -> bool {
        self.expanded_movements.contains(key)
    }

    /// Flatten `groups` plus their loaded children into one row sequence.
    ///
    /// Per group, in input order:
    /// 1. one `GroupHeader`;
    /// 2. if children have not loaded (`events` has no entry) and the group
    ///    reports an expected count, `min(expected, limit)` placeholders;
    /// 3. otherwise the first `limit` children, each a plain event row or a
    ///    subgroup (collapsed summary row, or collapse affordance followed
    ///    by its exploded event rows);
    /// 4. a trailing `LoadMore` sentinel when children remain hidden.
    pub fn flatten(&self, groups: &[EventGroup], events: &EventsByGroup) -> Vec<VirtualRow> {
        let mut rows = Vec::new();

        for group in groups {
            let group_id = &group.group_identifier;
            let limit = self.visible_count(group_id);

            rows.push(VirtualRow::GroupHeader {
                group_id: group_id.clone(),
            });

            let Some(children) = events.get(group_id) else {
                // Children pending: reserve space if we know how many.
                if let Some(expected) = group.grouped_events_num {
                    for i in 0..expected.min(limit) {
                        rows.push(VirtualRow::Placeholder {
                            group_id: group_id.clone(),
                            key: RowKey::child(i),
                        });
                    }
                }
                continue;
            };

            let taken = &children[..children.len().min(limit)];
            for (child_index, child) in taken.iter().enumerate() {
                match child {
                    GroupChild::Single(event) => rows.push(VirtualRow::Event {
                        group_id: group_id.clone(),
                        key: RowKey::child(child_index),
                        event: event.clone(),
                    }),
                    GroupChild::Subgroup(sub_events) => {
                        self.plan_subgroup(&mut rows, group_id, child_index, sub_events);
                    }
                }
            }

            if children.len() > limit {
                rows.push(VirtualRow::LoadMore {
                    group_id: group_id.clone(),
                    hidden_count: children.len() - limit,
                    total_count: children.len(),
                });
            }
        }

        tracing::trace!(
            groups = groups.len(),
            rows = rows.len(),
            "flattened history rows"
        );
        rows
    }

    fn plan_subgroup(
        &self,
        rows: &mut Vec<VirtualRow>,
        group_id: &GroupId,
        child_index: usize,
        sub_events: &[HistoryEvent],
    ) {
        let key = SubgroupKey::new(group_id.clone(), child_index);
        let kind = classify(sub_events);
        let expanded = match kind {
            SubgroupKind::Swap => self.expanded_swaps.contains(&key),
            SubgroupKind::MatchedMovement => self.expanded_movements.contains(&key),
        };

        if expanded {
            rows.push(match kind {
                SubgroupKind::Swap => VirtualRow::SwapCollapse {
                    group_id: group_id.clone(),
                    key,
                    count: sub_events.len(),
                },
                SubgroupKind::MatchedMovement => VirtualRow::MatchedMovementCollapse {
                    group_id: group_id.clone(),
                    key,
                    count: sub_events.len(),
                },
            });
            for (sub_index, event) in sub_events.iter().enumerate() {
                rows.push(VirtualRow::Event {
                    group_id: group_id.clone(),
                    key: RowKey::sub(child_index, sub_index),
                    event: event.clone(),
                });
            }
        } else {
            rows.push(match kind {
                SubgroupKind::Swap => VirtualRow::Swap {
                    group_id: group_id.clone(),
                    key,
                    events: sub_events.to_vec(),
                },
                SubgroupKind::MatchedMovement => VirtualRow::MatchedMovement {
                    group_id: group_id.clone(),
                    key,
                    events: sub_events.to_vec(),
                },
            });
        }
    }
}

/// A subgroup containing at least one asset-movement event is a matched
/// cross-location movement; anything else, including an empty subgroup, is
/// a swap. Element order does not matter.
fn classify(sub_events: &[HistoryEvent]) -> SubgroupKind {
    if sub_events
        .iter()
        .any(|event| event.entry_type.is_asset_movement())
    {
        SubgroupKind::MatchedMovement
    } else {
        SubgroupKind::Swap
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
