//! Error taxonomy for fetching, validation and persistence.
//!
//! Three failure classes cross the controller's boundary:
//!
//! - [`FetchError::Cancelled`]: expected under rapid filter changes;
//!   recovered locally and never surfaced.
//! - [`ValidationError`]: a filter value failed its schema; surfaced to the
//!   caller and the request is not sent.
//! - [`FetchError::Transport`]: left for the caller to surface; the
//!   controller keeps the previous settled state intact so a transient
//!   failure never blanks the table.
//!
//! All types compose via `#[from]` and propagate with `?`.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a page fetch issued through a
/// [`PageFetcher`](crate::controller::PageFetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request was cancelled by a newer request sharing its cancel tag.
    ///
    /// Swallowed silently by the controller: the fetch returns to idle
    /// without touching the settled state.
    #[error("request cancelled")]
    Cancelled,

    /// A filter value failed schema validation before the request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Transport or server failure.
    ///
    /// The controller logs it and leaves the previous settled state in
    /// place; there is no automatic retry.
    #[error("transport error: {0}")]
    Transport(String),
}

/// A filter field failed schema validation or query decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for filter field '{field}': {reason}")]
pub struct ValidationError {
    /// The filter field that rejected its value.
    pub field: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl ValidationError {
    /// Build a validation error for `field`.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of the persisted-filter backend.
///
/// Persistence is fire-and-forget for the controller: these errors are
/// logged, never propagated into the fetch path.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a snapshot file failed.
    #[error("filter store IO at {path}: {source}")]
    Io {
        /// Path of the snapshot involved.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be serialized or parsed.
    #[error("filter snapshot serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
