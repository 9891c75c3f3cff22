//! The injected async page-fetch seam.

use crate::model::{Collection, FetchError};
use crate::query::QueryMap;
use async_trait::async_trait;
use std::fmt;

/// Tag shared by requests that cancel one another.
///
/// With a tag configured, the controller cancels any outstanding request
/// carrying it immediately before issuing a new one: last request wins, no
/// queueing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CancelTag(String);

impl CancelTag {
    /// Build a tag from a caller-chosen string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CancelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Asynchronous page fetch with out-of-band cancel-by-tag.
///
/// `fetch` must be safely callable repeatedly. `cancel` is cooperative: it
/// does not abort anything synchronously, it causes the eventual rejection
/// of in-flight requests sharing `tag` to surface as
/// [`FetchError::Cancelled`], which the controller swallows.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch one page for the given request payload.
    async fn fetch(&self, payload: QueryMap) -> Result<Collection<T>, FetchError>;

    /// Request cancellation of in-flight fetches tagged with `tag`.
    fn cancel(&self, tag: &CancelTag);
}
