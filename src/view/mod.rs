//! Composition of the controller and the row planner into one
//! history-events view.
//!
//! The two halves stay loosely coupled: the planner never learns how pages
//! were fetched, and the controller never sees rows. This type just wires a
//! group-page controller to a planner and keeps the per-group children that
//! arrive out of band.

use crate::controller::{PageFetcher, PaginatedFilterController};
use crate::model::{EventGroup, EventsByGroup, GroupChild, GroupId, SubgroupKey};
use crate::query::FilterSchema;
use crate::rows::{LayoutMode, RowPlanner, RowWindow, VirtualRow};

/// A paginated history-events table: filtered group pages flattened into
/// virtual rows.
pub struct HistoryEventsView<S: FilterSchema, F> {
    controller: PaginatedFilterController<EventGroup, S, F>,
    planner: RowPlanner,
    events: EventsByGroup,
}

impl<S, F> HistoryEventsView<S, F>
where
    S: FilterSchema,
    F: PageFetcher<EventGroup> + 'static,
{
    /// View over `controller` with default planner limits.
    pub fn new(controller: PaginatedFilterController<EventGroup, S, F>) -> Self {
        Self::with_planner(controller, RowPlanner::new())
    }

    /// View over `controller` with an explicitly configured planner.
    pub fn with_planner(
        controller: PaginatedFilterController<EventGroup, S, F>,
        planner: RowPlanner,
    ) -> Self {
        Self {
            controller,
            planner,
            events: EventsByGroup::new(),
        }
    }

    /// The underlying controller, for filter/sort/pagination changes.
    pub fn controller(&self) -> &PaginatedFilterController<EventGroup, S, F> {
        &self.controller
    }

    /// Mutable access to the underlying controller.
    pub fn controller_mut(&mut self) -> &mut PaginatedFilterController<EventGroup, S, F> {
        &mut self.controller
    }

    /// Drive pending controller work to completion, then drop children of
    /// groups that are no longer on the page.
    pub async fn settle(&mut self) {
        self.controller.settle().await;
        self.prune_events();
    }

    /// Record the loaded children for one group.
    ///
    /// Groups without an entry render placeholders; an empty `children`
    /// marks the group as loaded with nothing below its header.
    pub fn set_group_events(&mut self, group: GroupId, children: Vec<GroupChild>) {
        self.events.insert(group, children);
    }

    /// Groups on the current page whose children have not been recorded
    /// yet. The embedding surface fetches these out of band.
    pub fn pending_groups(&self) -> Vec<&GroupId> {
        self.controller
            .state()
            .data
            .iter()
            .map(|group| &group.group_identifier)
            .filter(|id| !self.events.contains_key(id))
            .collect()
    }

    /// Flatten the current page into virtual rows.
    pub fn rows(&self) -> Vec<VirtualRow> {
        self.planner
            .flatten(&self.controller.state().data, &self.events)
    }

    /// Windowing index over [`rows`](Self::rows) for `layout`.
    pub fn window(&self, layout: LayoutMode) -> RowWindow {
        RowWindow::new(&self.rows(), layout)
    }

    /// Reveal one more step of `group`'s children.
    pub fn load_more(&mut self, group: &GroupId) {
        self.planner.load_more(group);
    }

    /// Flip expansion of the swap subgroup at `key`; returns the new state.
    pub fn toggle_swap_expanded(&mut self, key: SubgroupKey) -> bool {
        self.planner.toggle_swap_expanded(key)
    }

    /// Flip expansion of the matched-movement subgroup at `key`; returns
    /// the new state.
    pub fn toggle_movement_expanded(&mut self, key: SubgroupKey) -> bool {
        self.planner.toggle_movement_expanded(key)
    }

    fn prune_events(&mut self) {
        let page: std::collections::HashSet<&GroupId> = self
            .controller
            .state()
            .data
            .iter()
            .map(|group| &group.group_identifier)
            .collect();
        if self.events.keys().any(|id| !page.contains(id)) {
            self.events.retain(|id, _| page.contains(id));
        }
    }
}
