//! HTTP handlers for the Farm Grid Management API

mod farm;
mod health;
mod tree;
mod zone;

pub use farm::*;
pub use health::*;
pub use tree::*;
pub use zone::*;

use serde::Deserialize;

/// Query parameters accepted by delete endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// Also delete child records
    #[serde(default)]
    pub cascade: bool,
}
