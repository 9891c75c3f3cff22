//! Pagination and sort state, with their query-record codec.
//!
//! Unlike filter decoding, reading pagination and sort out of a query is
//! lenient: a missing or unparsable value falls back to defaults instead of
//! rejecting the navigation.

use crate::query::{QueryMap, QueryValue};
use serde::{Deserialize, Serialize};

/// Query key carrying the 1-based page number.
pub const PAGE_KEY: &str = "page";
/// Query key carrying the page size.
pub const LIMIT_KEY: &str = "limit";
/// Query key carrying the sort column.
pub const SORT_KEY: &str = "sort";
/// Query key carrying the sort direction (`asc`/`desc`).
pub const SORT_DIR_KEY: &str = "sortDir";

/// Current page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    /// Entries per page.
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl Pagination {
    /// Write `page`/`limit` keys into `query`.
    pub fn write_query(&self, query: &mut QueryMap) {
        query.insert(PAGE_KEY, QueryValue::single(self.page.to_string()));
        query.insert(LIMIT_KEY, QueryValue::single(self.limit.to_string()));
    }

    /// Read pagination from `query`; `None` unless both keys parse.
    pub fn read_query(query: &QueryMap) -> Option<Self> {
        let page = parse_usize(query, PAGE_KEY)?;
        let limit = parse_usize(query, LIMIT_KEY)?;
        (page >= 1 && limit >= 1).then_some(Self { page, limit })
    }
}

fn parse_usize(query: &QueryMap, key: &str) -> Option<usize> {
    query.get(key)?.as_single()?.parse().ok()
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending (`asc` on the wire).
    #[serde(rename = "asc")]
    Ascending,
    /// Descending (`desc` on the wire).
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Parse the wire form.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    /// Column to sort by.
    pub column: String,
    /// Direction to sort in.
    pub direction: SortDirection,
}

impl Sort {
    /// Descending sort on `column`.
    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Ascending sort on `column`.
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Write `sort`/`sortDir` keys into `query`.
    pub fn write_query(&self, query: &mut QueryMap) {
        query.insert(SORT_KEY, QueryValue::single(self.column.clone()));
        query.insert(
            SORT_DIR_KEY,
            QueryValue::single(self.direction.as_str()),
        );
    }

    /// Read a sort from `query`; `None` unless both keys are valid.
    pub fn read_query(query: &QueryMap) -> Option<Self> {
        let column = query.get(SORT_KEY)?.as_single()?.to_owned();
        let direction = SortDirection::parse(query.get(SORT_DIR_KEY)?.as_single()?)?;
        Some(Self { column, direction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_roundtrip() {
        let p = Pagination { page: 3, limit: 25 };
        let mut query = QueryMap::new();
        p.write_query(&mut query);
        assert_eq!(Pagination::read_query(&query), Some(p));
    }

    #[test]
    fn pagination_read_is_lenient() {
        let mut query = QueryMap::new();
        query.insert(PAGE_KEY, QueryValue::single("not-a-number"));
        query.insert(LIMIT_KEY, QueryValue::single("10"));
        assert_eq!(Pagination::read_query(&query), None);

        let mut zero = QueryMap::new();
        zero.insert(PAGE_KEY, QueryValue::single("0"));
        zero.insert(LIMIT_KEY, QueryValue::single("10"));
        assert_eq!(Pagination::read_query(&zero), None, "pages are 1-based");
    }

    #[test]
    fn sort_roundtrip() {
        let sort = Sort::descending("timestamp");
        let mut query = QueryMap::new();
        sort.write_query(&mut query);
        assert_eq!(Sort::read_query(&query), Some(sort));
    }

    #[test]
    fn sort_rejects_unknown_direction() {
        let mut query = QueryMap::new();
        query.insert(SORT_KEY, QueryValue::single("timestamp"));
        query.insert(SORT_DIR_KEY, QueryValue::single("sideways"));
        assert_eq!(Sort::read_query(&query), None);
    }
}
