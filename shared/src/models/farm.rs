//! Farm models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::admission::surface;
use crate::error::GridError;

/// A farm owned by a single owner.
///
/// The farm frame is a rectangle: `width` runs along the x axis and
/// `length` along the y axis, both in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Farm {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub location: Option<String>,
    #[serde(alias = "longueur")]
    pub length: Decimal,
    #[serde(alias = "largeur")]
    pub width: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Farm {
    /// Total surface in m²
    pub fn area(&self) -> Result<Decimal, GridError> {
        surface(self.width, self.length)
    }
}
