//! Tree grid layout
//!
//! Trees sit on a square grid with a fixed spacing in both axes. A slot is
//! addressed by `(row, index)`: rows grow along the zone length, indices
//! along the zone width, both starting at the zone's top-left corner.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::types::GridPosition;

/// Distance between neighbouring trees, in meters
pub const SPACING: u32 = 5;

/// Upper bound on a single bulk placement
pub const MAX_BULK_TREES: u32 = 1000;

/// Largest row number a tree may carry (rows are stored as 32-bit integers)
pub const MAX_ROW: u32 = i32::MAX as u32;

/// Number of slots that fit along `extent` meters
fn slots_along(extent: Decimal) -> u32 {
    if extent <= Decimal::ZERO {
        return 0;
    }
    (extent / Decimal::from(SPACING))
        .floor()
        .to_u32()
        .unwrap_or(u32::MAX)
}

/// Trees that fit in one row of a zone `width` meters wide
pub fn trees_per_row(width: Decimal) -> u32 {
    slots_along(width)
}

/// Rows that fit in a zone `length` meters long
pub fn grid_rows(length: Decimal) -> u32 {
    slots_along(length)
}

/// Physical position of a slot, measured from the zone's top-left corner
pub fn slot_to_position(row: u32, index: u32) -> GridPosition {
    GridPosition {
        x: u64::from(index) * u64::from(SPACING),
        y: u64::from(row) * u64::from(SPACING),
    }
}

/// Whether a slot falls inside the grid a zone of this size can hold
pub fn slot_within_grid(width: Decimal, length: Decimal, row: u32, index: u32) -> bool {
    index < trees_per_row(width) && row < grid_rows(length)
}

/// Tree code built from a prefix and a 1-based ordinal, zero-padded to three digits
pub fn tree_code(prefix: &str, ordinal: u32) -> String {
    format!("{}{:03}", prefix, ordinal)
}

/// One slot produced by a bulk placement plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    pub tree_code: String,
    pub row_number: u32,
    pub index_in_row: u32,
}

/// Lay out `count` trees row-major starting at `row_start`.
///
/// Rows are filled left to right, `trees_per_row(zone_width)` trees each.
/// The zone length is not consulted: plans may run past the last full row.
pub fn plan_bulk_placement(
    zone_width: Decimal,
    count: u32,
    row_start: u32,
    code_prefix: &str,
) -> Result<Vec<SlotAssignment>, GridError> {
    let per_row = trees_per_row(zone_width);
    if per_row == 0 {
        return Err(GridError::InvalidZoneDimensions { width: zone_width });
    }
    if count == 0 || count > MAX_BULK_TREES {
        return Err(GridError::CountOutOfRange { count });
    }

    let last_row = u64::from(row_start) + u64::from((count - 1) / per_row);
    if last_row > u64::from(MAX_ROW) {
        return Err(GridError::RowOutOfRange { row: last_row });
    }

    Ok((0..count)
        .map(|i| SlotAssignment {
            tree_code: tree_code(code_prefix, i + 1),
            row_number: row_start + i / per_row,
            index_in_row: i % per_row,
        })
        .collect())
}
