//! WebAssembly module for the Farm Grid Management platform
//!
//! Provides client-side previews for:
//! - Trees per row and slot positions on a zone grid
//! - Zone admission against a farm's area budget
//! - Bulk placement plans
//! - Farm capacity summaries

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{Farm, Zone};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

fn to_decimal(value: f64, name: &str) -> Result<Decimal, String> {
    Decimal::try_from(value).map_err(|_| format!("{} is not a finite number", name))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn plan_json(zone_width: f64, count: u32, row_start: u32, code_prefix: &str) -> Result<String, String> {
    let width = to_decimal(zone_width, "zone_width")?;
    let plan = shared::plan_bulk_placement(width, count, row_start, code_prefix)
        .map_err(|e| e.to_string())?;
    to_json(&plan)
}

fn capacity_json(farm_json: &str, zones_json: &str) -> Result<String, String> {
    let farm: Farm =
        serde_json::from_str(farm_json).map_err(|e| format!("Invalid farm JSON: {}", e))?;
    let zones: Vec<Zone> =
        serde_json::from_str(zones_json).map_err(|e| format!("Invalid zones JSON: {}", e))?;
    to_json(&shared::farm_capacity(&farm, &zones).map_err(|e| e.to_string())?)
}

/// Trees that fit in one row of a zone `width` meters wide
#[wasm_bindgen]
pub fn trees_per_row(width: f64) -> u32 {
    to_decimal(width, "width")
        .map(shared::trees_per_row)
        .unwrap_or(0)
}

/// Render position of a slot as `{"x": .., "y": ..}` in meters
#[wasm_bindgen]
pub fn slot_to_position(row: u32, index: u32) -> String {
    to_json(&shared::slot_to_position(row, index)).unwrap_or_default()
}

/// Whether a zone of `candidate_area` m² still fits next to `used_area` m² of zones
#[wasm_bindgen]
pub fn can_admit_zone_area(farm_area: f64, used_area: f64, candidate_area: f64) -> bool {
    match (
        to_decimal(farm_area, "farm_area"),
        to_decimal(used_area, "used_area"),
        to_decimal(candidate_area, "candidate_area"),
    ) {
        (Ok(farm), Ok(used), Ok(candidate)) if candidate >= Decimal::ZERO => {
            shared::fits_within(farm, used, candidate)
        }
        _ => false,
    }
}

/// Row-major bulk placement plan, as a JSON array of slot assignments
#[wasm_bindgen]
pub fn plan_bulk_placement(
    zone_width: f64,
    count: u32,
    row_start: u32,
    code_prefix: &str,
) -> Result<String, JsValue> {
    plan_json(zone_width, count, row_start, code_prefix).map_err(|e| JsValue::from_str(&e))
}

/// Capacity summary for a farm and its zones, both given as JSON
#[wasm_bindgen]
pub fn farm_capacity(farm_json: &str, zones_json: &str) -> Result<String, JsValue> {
    capacity_json(farm_json, zones_json).map_err(|e| JsValue::from_str(&e))
}
