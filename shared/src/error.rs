//! Errors raised by the pure placement rules

use rust_decimal::Decimal;
use thiserror::Error;

use crate::grid::{MAX_BULK_TREES, SPACING};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The zone cannot hold a single column of trees
    #[error("zone width {width} m is narrower than the {} m tree spacing", SPACING)]
    InvalidZoneDimensions { width: Decimal },

    #[error("tree count {count} must be between 1 and {}", MAX_BULK_TREES)]
    CountOutOfRange { count: u32 },

    #[error("row {row} is beyond the addressable grid")]
    RowOutOfRange { row: u64 },

    #[error("area {area} m² cannot be negative")]
    NegativeArea { area: Decimal },

    /// An area or area sum does not fit in a decimal
    #[error("area is too large to compute")]
    AreaOverflow,
}
