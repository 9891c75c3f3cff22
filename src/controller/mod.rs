//! Paginated, filterable data fetching with query-string sync and filter
//! persistence.
//!
//! The heart is [`PaginatedFilterController`], which owns one table's filter,
//! sort and pagination state and turns changes to it into debounced,
//! cancel-aware page fetches. [`PageFetcher`] is the injected transport seam;
//! [`ControllerOptions`] selects query sync and persistence behavior.

pub mod fetcher;
pub mod options;
pub mod paginated;
pub mod pagination;

pub use fetcher::{CancelTag, PageFetcher};
pub use options::{ControllerOptions, PersistFilter, QuerySync};
pub use paginated::{ControllerPhase, PaginatedFilterController};
pub use pagination::{Pagination, Sort, SortDirection};
