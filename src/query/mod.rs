//! Flat query-string records and the filter schema seam.
//!
//! A [`QueryMap`] is the language the controller speaks with everything
//! outside it: the external query-string source, the request payload handed
//! to the page fetcher, and the persisted filter snapshots. All values are
//! strings or string arrays, mirroring what a URL can carry.

pub mod schema;
pub mod source;

pub use schema::FilterSchema;
pub use source::{MemoryQuerySource, PushGeneration, QuerySource, RouteChange};

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A single query value: one string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// One value, e.g. `location=kraken`.
    Single(String),
    /// Repeated values, e.g. `asset=ETH&asset=BTC`.
    Multi(Vec<String>),
}

impl QueryValue {
    /// Build a single-string value.
    pub fn single(value: impl Into<String>) -> Self {
        QueryValue::Single(value.into())
    }

    /// Build a multi-string value.
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryValue::Multi(values.into_iter().map(Into::into).collect())
    }

    /// The value as a single string, if it is one.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            QueryValue::Single(s) => Some(s),
            QueryValue::Multi(_) => None,
        }
    }

    /// All carried strings, regardless of arity.
    pub fn as_strings(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(s) => vec![s.as_str()],
            QueryValue::Multi(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// Flat, ordered, string-keyed query record.
///
/// Backed by a `BTreeMap` so iteration and serialization are deterministic,
/// which keeps persisted snapshots and pushed queries stable across
/// recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryMap(BTreeMap<String, QueryValue>);

impl QueryMap {
    /// Empty query record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key.
    pub fn insert(&mut self, key: impl Into<String>, value: QueryValue) {
        self.0.insert(key.into(), value);
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    /// Remove a key, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.0.remove(key)
    }

    /// Whether the record has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over key/value pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, QueryValue> {
        self.0.iter()
    }

    /// Copy every entry of `other` into this record, replacing on clash.
    pub fn merge(&mut self, other: &QueryMap) {
        for (k, v) in other.iter() {
            self.0.insert(k.clone(), v.clone());
        }
    }
}

impl<'a> IntoIterator for &'a QueryMap {
    type Item = (&'a String, &'a QueryValue);
    type IntoIter = btree_map::Iter<'a, String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(String, QueryValue)> for QueryMap {
    fn from_iter<I: IntoIterator<Item = (String, QueryValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
