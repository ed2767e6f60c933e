//! Irrigation zone models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::admission::surface;
use crate::error::GridError;
use crate::types::Rect;

/// Irrigation mode of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "irrigation_mode", rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum IrrigationMode {
    #[default]
    Auto,
    Manual,
}

impl std::fmt::Display for IrrigationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IrrigationMode::Auto => write!(f, "AUTO"),
            IrrigationMode::Manual => write!(f, "MANUAL"),
        }
    }
}

/// A rectangular irrigation zone inside a farm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Zone {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub name: String,
    pub crop_type: Option<String>,
    pub width: Decimal,
    pub length: Decimal,
    /// Top-left offset in the farm frame (meters)
    pub x: Decimal,
    pub y: Decimal,
    pub mode: IrrigationMode,
    /// Soil moisture percentage that triggers irrigation
    pub moisture_threshold: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Zone {
    pub fn area(&self) -> Result<Decimal, GridError> {
        surface(self.width, self.length)
    }

    /// Footprint of the zone in the farm frame
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.length)
    }
}
