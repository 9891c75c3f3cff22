//! Bidirectional codec between typed filters and flat query records.

use super::QueryMap;
use crate::model::ValidationError;

/// Schema of one table's filters: a typed record plus its query codec.
///
/// `decode` is the validation boundary of the whole controller. A value the
/// schema rejects surfaces as a [`ValidationError`] and the request is not
/// sent; the caller keeps the user's raw input and decides how to signal
/// the rejection.
///
/// Implementations must ignore query keys they do not recognize: the live
/// query also carries pagination, sort and caller-supplied extra
/// parameters, and a persisted snapshot may predate a schema change.
///
/// The codec must round-trip: `decode(&encode(&f)) == Ok(f)` for every
/// valid `f`.
pub trait FilterSchema {
    /// The typed filter record for this table.
    type Filters: Clone + Default + PartialEq + std::fmt::Debug;

    /// Serialize filters into flat query form. Fields at their empty/unset
    /// state must not emit a key.
    fn encode(filters: &Self::Filters) -> QueryMap;

    /// Parse and validate filters out of a flat query record.
    fn decode(query: &QueryMap) -> Result<Self::Filters, ValidationError>;
}
