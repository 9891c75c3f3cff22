//! histview
//!
//! Engine behind a virtualized history-events table: flattens
//! hierarchically grouped ledger events into typed virtual rows, and owns
//! the paginated, persisted, debounced filter state that drives page
//! fetches.
//!
//! The two halves are independent. The `rows` tree is pure data shaping
//! (groups in, rows out); the `controller` tree turns filter, sort and
//! pagination changes into cancel-aware fetches through an injected
//! [`PageFetcher`](controller::PageFetcher), mirrors itself into an
//! external query source, and persists sanitized snapshots. `view` is the
//! thin composition a table surface embeds.

pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod query;
pub mod rows;
pub mod view;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
