//! Domain model types (pure data).

pub mod collection;
pub mod error;
pub mod event;
pub mod group;
pub mod identifiers;

// Re-export for convenience
pub use collection::Collection;
pub use error::{FetchError, StoreError, ValidationError};
pub use event::{EntryType, EventSubtype, GroupChild, HistoryEvent};
pub use group::{EventGroup, EventsByGroup};
pub use identifiers::{
    EventId, GroupId, InvalidGroupId, InvalidTableId, RowKey, SubgroupKey, TableId,
};
