//! Identifier newtypes with smart constructors.
//!
//! String-backed identifiers validate non-empty input at construction time;
//! the raw constructors are never exported. Composite keys (`SubgroupKey`,
//! `RowKey`) give sub-rows structural identity with no arithmetic packing,
//! so a group may have any number of children without key collisions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique key of a top-level event group (one transaction, one trade).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupId(String);

impl GroupId {
    /// Smart constructor: rejects empty identifiers.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidGroupId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidGroupId::Empty);
        }
        Ok(Self(raw))
    }

    /// The underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupId {
    type Error = InvalidGroupId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<GroupId> for String {
    fn from(id: GroupId) -> Self {
        id.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Numeric identifier of a single ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    /// Wrap a raw event identifier.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one table instance, scoping persisted filter snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableId(String);

impl TableId {
    /// Smart constructor: rejects empty identifiers.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidTableId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidTableId::Empty);
        }
        Ok(Self(raw))
    }

    /// The underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TableId {
    type Error = InvalidTableId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<TableId> for String {
    fn from(id: TableId) -> Self {
        id.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a nested subgroup (swap legs or a matched movement pair) within a
/// group: the owning group plus the child slot the subgroup occupies.
///
/// Expansion state is tracked per `SubgroupKey`, so toggling one subgroup
/// never affects another, even at the same child index of a different group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubgroupKey {
    /// Owning group.
    pub group: GroupId,
    /// Zero-based index of the subgroup among the group's direct children.
    pub child_index: usize,
}

impl SubgroupKey {
    /// Build a key for the subgroup at `child_index` of `group`.
    pub fn new(group: GroupId, child_index: usize) -> Self {
        Self { group, child_index }
    }
}

impl fmt::Display for SubgroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.child_index)
    }
}

/// Position of an event or placeholder row within its group.
///
/// Top-level children get `sub_index: None`; rows exploded out of an
/// expanded subgroup get `Some(position within the subgroup)`. Equality is
/// structural, so keys are unique by construction regardless of how many
/// direct children a group has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey {
    /// Zero-based index of the child slot within the group.
    pub child_index: usize,
    /// Position within an exploded subgroup, if this row came from one.
    pub sub_index: Option<usize>,
}

impl RowKey {
    /// Key for a top-level child row.
    pub fn child(child_index: usize) -> Self {
        Self {
            child_index,
            sub_index: None,
        }
    }

    /// Key for a row exploded out of the subgroup at `child_index`.
    pub fn sub(child_index: usize, sub_index: usize) -> Self {
        Self {
            child_index,
            sub_index: Some(sub_index),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_index {
            Some(sub) => write!(f, "{}.{}", self.child_index, sub),
            None => write!(f, "{}", self.child_index),
        }
    }
}

// ===== Error Types =====

/// Error constructing a [`GroupId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidGroupId {
    /// Group identifiers cannot be empty.
    #[error("group identifier cannot be empty")]
    Empty,
}

/// Error constructing a [`TableId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTableId {
    /// Table identifiers cannot be empty.
    #[error("table identifier cannot be empty")]
    Empty,
}
