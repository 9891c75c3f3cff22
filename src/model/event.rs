//! History events: the single ledger entries that groups contain.

use super::identifiers::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminates the kind of ledger entry an event represents.
///
/// The wire names match the backend's entry-type vocabulary. The only kind
/// the row planner treats specially is [`EntryType::AssetMovementEvent`]:
/// its presence inside a subgroup marks that subgroup as a matched
/// cross-location movement rather than a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryType {
    /// Plain history event (exchange trades, manual entries).
    #[serde(rename = "history event")]
    HistoryEvent,
    /// On-chain EVM event.
    #[serde(rename = "evm event")]
    EvmEvent,
    /// Atomic swap decoded from an EVM transaction.
    #[serde(rename = "evm swap event")]
    EvmSwapEvent,
    /// Atomic swap decoded from a Solana transaction.
    #[serde(rename = "solana swap event")]
    SolanaSwapEvent,
    /// One side of a deposit/withdrawal matched across locations.
    #[serde(rename = "asset movement event")]
    AssetMovementEvent,
    /// Ethereum staking deposit.
    #[serde(rename = "eth deposit event")]
    EthDepositEvent,
    /// Ethereum staking withdrawal.
    #[serde(rename = "eth withdrawal event")]
    EthWithdrawalEvent,
    /// Ethereum block production reward.
    #[serde(rename = "eth block event")]
    EthBlockEvent,
}

impl EntryType {
    /// Whether this entry kind marks a matched cross-location movement.
    pub fn is_asset_movement(self) -> bool {
        matches!(self, EntryType::AssetMovementEvent)
    }
}

/// Finer-grained classification within an entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSubtype {
    /// No specific subtype.
    None,
    /// Fee paid for the containing group's operation.
    Fee,
    /// Outgoing asset amount.
    Spend,
    /// Incoming asset amount.
    Receive,
}

/// A single ledger entry belonging to a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// Unique numeric identifier.
    pub identifier: EventId,
    /// Entry kind discriminant.
    pub entry_type: EntryType,
    /// Subtype within the entry kind.
    pub event_subtype: EventSubtype,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Asset the event concerns (identifier string, resolved upstream).
    pub asset: String,
    /// Location the event was recorded at (chain or exchange name).
    pub location: String,
}

/// One direct child of a group: either a plain event or a nested subgroup
/// delivered pre-grouped (an atomic swap or a matched movement pair).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupChild {
    /// A single event.
    Single(HistoryEvent),
    /// A nested list rendered as one summary row until expanded.
    Subgroup(Vec<HistoryEvent>),
}

impl GroupChild {
    /// Whether this child is a nested subgroup.
    pub fn is_subgroup(&self) -> bool {
        matches!(self, GroupChild::Subgroup(_))
    }
}
