//! Shared types and rules for the Farm Grid Management platform
//!
//! This crate holds the domain models and the pure placement rules
//! (zone admission, tree grid layout, farm capacity) used by both the
//! backend and the browser-side WASM module.

pub mod admission;
pub mod capacity;
pub mod error;
pub mod grid;
pub mod models;
pub mod types;
pub mod validation;

pub use admission::*;
pub use capacity::*;
pub use error::*;
pub use grid::*;
pub use models::*;
pub use types::*;
pub use validation::*;
