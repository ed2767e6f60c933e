//! In-memory store adapter
//!
//! Rows live in insertion-ordered vectors behind one async lock, so every
//! operation (cascades included) is atomic with respect to the others.

use async_trait::async_trait;
use shared::{Farm, Tree, Zone};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FarmStore, StoreHealth, TreeStore, ZoneStore};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    farms: Vec<Farm>,
    zones: Vec<Zone>,
    trees: Vec<Tree>,
}

/// Process-local store
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(resource: &str) -> AppError {
    AppError::NotFound(resource.to_string())
}

#[async_trait]
impl FarmStore for MemoryStore {
    async fn get_farm(&self, farm_id: Uuid) -> AppResult<Farm> {
        let tables = self.tables.read().await;
        tables
            .farms
            .iter()
            .find(|f| f.id == farm_id)
            .cloned()
            .ok_or_else(|| not_found("Farm"))
    }

    async fn list_farms_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Farm>> {
        let tables = self.tables.read().await;
        Ok(tables
            .farms
            .iter()
            .rev()
            .filter(|f| f.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert_farm(&self, farm: Farm) -> AppResult<Farm> {
        let mut tables = self.tables.write().await;
        tables.farms.push(farm.clone());
        Ok(farm)
    }

    async fn update_farm(&self, farm: Farm) -> AppResult<Farm> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .farms
            .iter_mut()
            .find(|f| f.id == farm.id)
            .ok_or_else(|| not_found("Farm"))?;

        existing.name = farm.name;
        existing.location = farm.location;
        existing.length = farm.length;
        existing.width = farm.width;
        Ok(existing.clone())
    }

    async fn delete_farm(&self, farm_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.farms.len();
        tables.farms.retain(|f| f.id != farm_id);
        if tables.farms.len() == before {
            return Err(not_found("Farm"));
        }
        Ok(())
    }

    async fn delete_farm_cascade(&self, farm_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.farms.iter().any(|f| f.id == farm_id) {
            return Err(not_found("Farm"));
        }

        let zone_ids: Vec<Uuid> = tables
            .zones
            .iter()
            .filter(|z| z.farm_id == farm_id)
            .map(|z| z.id)
            .collect();
        tables.trees.retain(|t| !zone_ids.contains(&t.zone_id));
        tables.zones.retain(|z| z.farm_id != farm_id);
        tables.farms.retain(|f| f.id != farm_id);
        Ok(())
    }
}

#[async_trait]
impl ZoneStore for MemoryStore {
    async fn get_zone(&self, zone_id: Uuid) -> AppResult<Zone> {
        let tables = self.tables.read().await;
        tables
            .zones
            .iter()
            .find(|z| z.id == zone_id)
            .cloned()
            .ok_or_else(|| not_found("Zone"))
    }

    async fn list_zones_by_farm(&self, farm_id: Uuid) -> AppResult<Vec<Zone>> {
        let tables = self.tables.read().await;
        Ok(tables
            .zones
            .iter()
            .filter(|z| z.farm_id == farm_id)
            .cloned()
            .collect())
    }

    async fn insert_zone(&self, zone: Zone) -> AppResult<Zone> {
        let mut tables = self.tables.write().await;
        tables.zones.push(zone.clone());
        Ok(zone)
    }

    async fn delete_zone(&self, zone_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.zones.len();
        tables.zones.retain(|z| z.id != zone_id);
        if tables.zones.len() == before {
            return Err(not_found("Zone"));
        }
        Ok(())
    }

    async fn delete_zone_cascade(&self, zone_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.zones.iter().any(|z| z.id == zone_id) {
            return Err(not_found("Zone"));
        }

        tables.trees.retain(|t| t.zone_id != zone_id);
        tables.zones.retain(|z| z.id != zone_id);
        Ok(())
    }
}

#[async_trait]
impl TreeStore for MemoryStore {
    async fn get_tree(&self, tree_id: Uuid) -> AppResult<Tree> {
        let tables = self.tables.read().await;
        tables
            .trees
            .iter()
            .find(|t| t.id == tree_id)
            .cloned()
            .ok_or_else(|| not_found("Tree"))
    }

    async fn list_trees_by_zone(&self, zone_id: Uuid) -> AppResult<Vec<Tree>> {
        let tables = self.tables.read().await;
        let mut trees: Vec<Tree> = tables
            .trees
            .iter()
            .filter(|t| t.zone_id == zone_id)
            .cloned()
            .collect();
        trees.sort_by(|a, b| {
            (a.row_number, a.index_in_row, &a.tree_code).cmp(&(
                b.row_number,
                b.index_in_row,
                &b.tree_code,
            ))
        });
        Ok(trees)
    }

    async fn insert_tree(&self, tree: Tree) -> AppResult<Tree> {
        let mut tables = self.tables.write().await;
        tables.trees.push(tree.clone());
        Ok(tree)
    }

    async fn insert_trees(&self, trees: Vec<Tree>) -> AppResult<Vec<Tree>> {
        let mut tables = self.tables.write().await;
        tables.trees.extend(trees.iter().cloned());
        Ok(trees)
    }

    async fn delete_tree(&self, tree_id: Uuid) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.trees.len();
        tables.trees.retain(|t| t.id != tree_id);
        if tables.trees.len() == before {
            return Err(not_found("Tree"));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
