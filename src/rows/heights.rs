//! Constant per-row-kind pixel heights.
//!
//! Two independent tables: one for the regular row layout, one for the
//! narrow card layout. Heights are fixed per kind so a windowing index can
//! be built without measuring rendered content.

use super::virtual_row::RowKind;

/// Pixel height of a row kind in the regular row layout.
pub const fn row_height(kind: RowKind) -> u32 {
    match kind {
        RowKind::GroupHeader => 60,
        RowKind::Event => 72,
        RowKind::Placeholder => 72,
        RowKind::Swap => 72,
        RowKind::SwapCollapse => 40,
        RowKind::MatchedMovement => 72,
        RowKind::MatchedMovementCollapse => 40,
        RowKind::LoadMore => 36,
    }
}

/// Pixel height of a row kind in the card layout.
pub const fn card_height(kind: RowKind) -> u32 {
    match kind {
        RowKind::GroupHeader => 72,
        RowKind::Event => 204,
        RowKind::Placeholder => 204,
        RowKind::Swap => 204,
        RowKind::SwapCollapse => 48,
        RowKind::MatchedMovement => 204,
        RowKind::MatchedMovementCollapse => 48,
        RowKind::LoadMore => 44,
    }
}
