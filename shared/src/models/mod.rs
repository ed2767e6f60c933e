//! Domain models for farms, irrigation zones and trees

mod farm;
mod tree;
mod zone;

pub use farm::*;
pub use tree::*;
pub use zone::*;
