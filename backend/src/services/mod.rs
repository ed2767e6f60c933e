//! Business logic services for the Farm Grid Management platform

pub mod farm;
pub mod locks;
pub mod tree;
pub mod zone;

pub use farm::FarmService;
pub use locks::FarmLocks;
pub use tree::TreeService;
pub use zone::ZoneService;
