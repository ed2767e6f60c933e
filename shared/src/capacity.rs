//! Farm capacity summary
//!
//! Reports how much of a farm's surface is allocated to zones and how much
//! room the farm diagram still shows. The diagram lays zones out in shelves:
//! left to right along the farm width, opening a new shelf when the next
//! zone would overflow the current one.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::admission::used_area;
use crate::error::GridError;
use crate::models::{Farm, Zone};

/// Allocation figures for one farm
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FarmCapacity {
    pub farm_id: Uuid,
    pub zone_count: usize,
    pub total_area: Decimal,
    pub used_area: Decimal,
    /// Clamped at zero when zones were admitted before a farm was shrunk
    pub remaining_area: Decimal,
    /// Widest zone that still fits on the last shelf
    pub remaining_width_max: Decimal,
    /// Longest zone that still fits below the last shelf
    pub remaining_length_max: Decimal,
    /// Zone pairs whose rectangles share surface in the farm frame
    pub overlapping_zones: Vec<(Uuid, Uuid)>,
}

/// Width used on the last shelf and total length used by all shelves
fn shelf_extent(farm_width: Decimal, zones: &[Zone]) -> (Decimal, Decimal) {
    let mut row_width = Decimal::ZERO;
    let mut row_length = Decimal::ZERO;
    let mut stacked_length = Decimal::ZERO;

    for zone in zones {
        if row_width.saturating_add(zone.width) > farm_width {
            stacked_length = stacked_length.saturating_add(row_length);
            row_width = Decimal::ZERO;
            row_length = Decimal::ZERO;
        }
        row_width = row_width.saturating_add(zone.width);
        row_length = row_length.max(zone.length);
    }

    (row_width, stacked_length.saturating_add(row_length))
}

fn overlapping_pairs(zones: &[Zone]) -> Vec<(Uuid, Uuid)> {
    let mut pairs = Vec::new();
    for (i, a) in zones.iter().enumerate() {
        for b in &zones[i + 1..] {
            if a.rect().overlaps(&b.rect()) {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}

/// Summarise allocation for `farm`; `zones` in creation order
pub fn farm_capacity(farm: &Farm, zones: &[Zone]) -> Result<FarmCapacity, GridError> {
    let total_area = farm.area()?;
    let used = used_area(zones)?;
    let (used_width, used_length) = shelf_extent(farm.width, zones);

    Ok(FarmCapacity {
        farm_id: farm.id,
        zone_count: zones.len(),
        total_area,
        used_area: used,
        remaining_area: total_area.saturating_sub(used).max(Decimal::ZERO),
        remaining_width_max: farm.width.saturating_sub(used_width).max(Decimal::ZERO),
        remaining_length_max: farm.length.saturating_sub(used_length).max(Decimal::ZERO),
        overlapping_zones: overlapping_pairs(zones),
    })
}
