//! Row flattening engine.
//!
//! Converts hierarchically grouped history events plus per-group view state
//! (visible counts, expansion sets) into one ordered, flat sequence of
//! typed virtual rows, with constant height tables and a prefix-sum window
//! index for scroll virtualization. Pure data shaping: no knowledge of how
//! the data was fetched.

pub mod heights;
pub mod planner;
pub mod virtual_row;
pub mod window;

pub use heights::{card_height, row_height};
pub use planner::{RowPlanner, INITIAL_VISIBLE_EVENTS, VISIBLE_EVENTS_STEP};
pub use virtual_row::{RowKind, VirtualRow};
pub use window::{LayoutMode, RowWindow};
