//! Tree models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Observed health of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "tree_health", rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum TreeHealth {
    #[default]
    Ok,
    Stress,
    Disease,
}

impl std::fmt::Display for TreeHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeHealth::Ok => write!(f, "OK"),
            TreeHealth::Stress => write!(f, "STRESS"),
            TreeHealth::Disease => write!(f, "DISEASE"),
        }
    }
}

/// A tree placed on a zone's planting grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Tree {
    pub id: Uuid,
    pub zone_id: Uuid,
    pub tree_code: String,
    /// Zero-based grid row
    pub row_number: i32,
    /// Zero-based column within the row
    pub index_in_row: i32,
    pub health_status: TreeHealth,
    pub last_seen_at: Option<DateTime<Utc>>,
}
