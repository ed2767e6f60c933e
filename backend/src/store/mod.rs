//! Persistence ports for farms, zones and trees
//!
//! Services talk to the store through these traits only. Two adapters are
//! provided: [`PgStore`] for PostgreSQL and [`MemoryStore`] for local runs
//! and tests.

use std::sync::Arc;

use async_trait::async_trait;
use shared::{Farm, Tree, Zone};
use uuid::Uuid;

use crate::error::AppResult;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Farm records
#[async_trait]
pub trait FarmStore: Send + Sync {
    /// Fails with `NotFound` when no farm has this id
    async fn get_farm(&self, farm_id: Uuid) -> AppResult<Farm>;

    /// Farms of one owner, newest first
    async fn list_farms_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Farm>>;

    async fn insert_farm(&self, farm: Farm) -> AppResult<Farm>;

    /// Overwrite name, location and dimensions of an existing farm
    async fn update_farm(&self, farm: Farm) -> AppResult<Farm>;

    /// Remove the farm row only; zones and trees are left in place
    async fn delete_farm(&self, farm_id: Uuid) -> AppResult<()>;

    /// Remove trees, zones, then the farm, as one unit
    async fn delete_farm_cascade(&self, farm_id: Uuid) -> AppResult<()>;
}

/// Zone records
#[async_trait]
pub trait ZoneStore: Send + Sync {
    async fn get_zone(&self, zone_id: Uuid) -> AppResult<Zone>;

    /// Zones of one farm in creation order
    async fn list_zones_by_farm(&self, farm_id: Uuid) -> AppResult<Vec<Zone>>;

    async fn insert_zone(&self, zone: Zone) -> AppResult<Zone>;

    /// Remove the zone row only; its trees are left in place
    async fn delete_zone(&self, zone_id: Uuid) -> AppResult<()>;

    /// Remove the zone's trees, then the zone, as one unit
    async fn delete_zone_cascade(&self, zone_id: Uuid) -> AppResult<()>;
}

/// Tree records
#[async_trait]
pub trait TreeStore: Send + Sync {
    async fn get_tree(&self, tree_id: Uuid) -> AppResult<Tree>;

    /// Trees of one zone ordered by row, then index in row
    async fn list_trees_by_zone(&self, zone_id: Uuid) -> AppResult<Vec<Tree>>;

    async fn insert_tree(&self, tree: Tree) -> AppResult<Tree>;

    /// Insert a batch, returned in input order
    async fn insert_trees(&self, trees: Vec<Tree>) -> AppResult<Vec<Tree>>;

    async fn delete_tree(&self, tree_id: Uuid) -> AppResult<()>;
}

/// Store liveness, reported by the health endpoint
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    /// Short adapter name for health output
    fn backend_name(&self) -> &'static str;
}

/// The store ports the services depend on, all backed by one adapter
#[derive(Clone)]
pub struct Stores {
    pub farms: Arc<dyn FarmStore>,
    pub zones: Arc<dyn ZoneStore>,
    pub trees: Arc<dyn TreeStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    pub fn from_adapter<S>(adapter: S) -> Self
    where
        S: FarmStore + ZoneStore + TreeStore + StoreHealth + 'static,
    {
        let adapter = Arc::new(adapter);
        Self {
            farms: adapter.clone(),
            zones: adapter.clone(),
            trees: adapter.clone(),
            health: adapter,
        }
    }

    /// Fresh in-memory stores
    pub fn in_memory() -> Self {
        Self::from_adapter(MemoryStore::new())
    }
}
