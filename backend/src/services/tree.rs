//! Tree placement service

use serde::{Deserialize, Serialize};
use shared::{GridPosition, Tree, TreeHealth, Zone};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::zone::zone_in_farm;
use crate::store::Stores;

/// Tree service for placing trees on a zone's grid
#[derive(Clone)]
pub struct TreeService {
    stores: Stores,
}

/// Input for placing one tree
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceTreeInput {
    #[serde(default)]
    pub tree_code: String,
    pub row_number: Option<i32>,
    pub index_in_row: Option<i32>,
    pub health_status: Option<TreeHealth>,
}

/// Body of the tree creation endpoint: one tree or an array of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CreateTreesRequest {
    Batch(Vec<PlaceTreeInput>),
    Single(PlaceTreeInput),
}

fn default_code_prefix() -> String {
    "T".to_string()
}

/// Input for laying out many trees row by row
#[derive(Debug, Deserialize, Validate)]
pub struct BulkPlacementInput {
    pub count: u32,
    #[serde(default)]
    #[validate(range(min = 0, message = "Row start cannot be negative"))]
    pub row_start: i32,
    #[serde(default = "default_code_prefix")]
    pub code_prefix: String,
    pub health_status: Option<TreeHealth>,
}

/// A tree with its rendered position on the zone
#[derive(Debug, Serialize)]
pub struct PlacedTree {
    #[serde(flatten)]
    pub tree: Tree,
    pub position: GridPosition,
    /// False when the slot lies outside the grid the zone can hold
    pub within_grid: bool,
}

/// Planting grid of one zone
#[derive(Debug, Serialize)]
pub struct ZoneGrid {
    pub zone_id: Uuid,
    pub spacing: u32,
    pub trees_per_row: u32,
    pub rows: u32,
    pub slot_capacity: u64,
    pub trees: Vec<PlacedTree>,
}

/// Check one tree input and build the record for `zone_id`
fn build_tree(zone_id: Uuid, input: PlaceTreeInput) -> AppResult<Tree> {
    shared::validate_tree_code(&input.tree_code).map_err(|msg| {
        AppError::invalid("tree_code", msg, "Le code de l'arbre ne peut pas être vide")
    })?;

    let row_number = input.row_number.unwrap_or(0);
    let index_in_row = input.index_in_row.unwrap_or(0);
    shared::validate_grid_index(row_number).map_err(|msg| {
        AppError::invalid("row_number", msg, "Le numéro de rangée ne peut pas être négatif")
    })?;
    shared::validate_grid_index(index_in_row).map_err(|msg| {
        AppError::invalid("index_in_row", msg, "La position dans la rangée ne peut pas être négative")
    })?;

    Ok(Tree {
        id: Uuid::new_v4(),
        zone_id,
        tree_code: input.tree_code.trim().to_string(),
        row_number,
        index_in_row,
        health_status: input.health_status.unwrap_or_default(),
        last_seen_at: None,
    })
}

fn place(zone: &Zone, tree: Tree) -> PlacedTree {
    // stored indices are validated non-negative on write
    let row = u32::try_from(tree.row_number).unwrap_or(0);
    let index = u32::try_from(tree.index_in_row).unwrap_or(0);

    PlacedTree {
        position: shared::slot_to_position(row, index),
        within_grid: shared::slot_within_grid(zone.width, zone.length, row, index),
        tree,
    }
}

impl TreeService {
    /// Create a new TreeService instance
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Get all trees of a zone in grid order
    pub async fn list_trees(&self, farm_id: Uuid, zone_id: Uuid) -> AppResult<Vec<Tree>> {
        zone_in_farm(&self.stores, farm_id, zone_id).await?;
        self.stores.trees.list_trees_by_zone(zone_id).await
    }

    /// Place one tree at an explicit slot
    pub async fn place_single_tree(
        &self,
        farm_id: Uuid,
        zone_id: Uuid,
        input: PlaceTreeInput,
    ) -> AppResult<Tree> {
        zone_in_farm(&self.stores, farm_id, zone_id).await?;
        let tree = self.stores.trees.insert_tree(build_tree(zone_id, input)?).await?;

        tracing::info!(
            %zone_id,
            tree_id = %tree.id,
            row = tree.row_number,
            index = tree.index_in_row,
            "Tree placed"
        );
        Ok(tree)
    }

    /// Place several explicitly positioned trees as one batch
    pub async fn place_trees_batch(
        &self,
        farm_id: Uuid,
        zone_id: Uuid,
        inputs: Vec<PlaceTreeInput>,
    ) -> AppResult<Vec<Tree>> {
        if inputs.is_empty() {
            return Err(AppError::invalid(
                "trees",
                "At least one tree is required",
                "Au moins un arbre est requis",
            ));
        }

        zone_in_farm(&self.stores, farm_id, zone_id).await?;
        let trees = inputs
            .into_iter()
            .map(|input| build_tree(zone_id, input))
            .collect::<AppResult<Vec<_>>>()?;

        let trees = self.stores.trees.insert_trees(trees).await?;
        tracing::info!(%zone_id, count = trees.len(), "Tree batch placed");
        Ok(trees)
    }

    /// Dispatch a single-or-array creation request
    pub async fn create_trees(
        &self,
        farm_id: Uuid,
        zone_id: Uuid,
        request: CreateTreesRequest,
    ) -> AppResult<Vec<Tree>> {
        match request {
            CreateTreesRequest::Single(input) => Ok(vec![
                self.place_single_tree(farm_id, zone_id, input).await?,
            ]),
            CreateTreesRequest::Batch(inputs) => {
                self.place_trees_batch(farm_id, zone_id, inputs).await
            }
        }
    }

    /// Lay out `count` trees row-major from `row_start`, filling each row to the zone width
    pub async fn place_trees_bulk(
        &self,
        farm_id: Uuid,
        zone_id: Uuid,
        input: BulkPlacementInput,
    ) -> AppResult<Vec<Tree>> {
        input.validate()?;
        let zone = zone_in_farm(&self.stores, farm_id, zone_id).await?;

        let row_start = u32::try_from(input.row_start).map_err(|_| {
            AppError::invalid(
                "row_start",
                "Row start cannot be negative",
                "La rangée de départ ne peut pas être négative",
            )
        })?;
        let plan =
            shared::plan_bulk_placement(zone.width, input.count, row_start, &input.code_prefix)?;

        let health_status = input.health_status.unwrap_or_default();
        let trees = plan
            .into_iter()
            .map(|slot| {
                // the plan keeps rows within MAX_ROW and indices below trees_per_row
                let row_number = i32::try_from(slot.row_number)
                    .map_err(|_| AppError::Internal("row number overflow".to_string()))?;
                let index_in_row = i32::try_from(slot.index_in_row)
                    .map_err(|_| AppError::Internal("row index overflow".to_string()))?;
                Ok(Tree {
                    id: Uuid::new_v4(),
                    zone_id,
                    tree_code: slot.tree_code,
                    row_number,
                    index_in_row,
                    health_status,
                    last_seen_at: None,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let trees = self.stores.trees.insert_trees(trees).await?;
        tracing::info!(
            %zone_id,
            count = trees.len(),
            per_row = shared::trees_per_row(zone.width),
            row_start,
            "Bulk tree placement done"
        );
        Ok(trees)
    }

    /// Remove a tree of the zone
    pub async fn delete_tree(&self, farm_id: Uuid, zone_id: Uuid, tree_id: Uuid) -> AppResult<()> {
        zone_in_farm(&self.stores, farm_id, zone_id).await?;
        let tree = self.stores.trees.get_tree(tree_id).await?;
        if tree.zone_id != zone_id {
            return Err(AppError::NotFound("Tree".to_string()));
        }

        self.stores.trees.delete_tree(tree_id).await?;
        tracing::info!(%zone_id, %tree_id, "Tree deleted");
        Ok(())
    }

    /// Grid dimensions of a zone with every tree at its rendered position
    pub async fn zone_grid(&self, farm_id: Uuid, zone_id: Uuid) -> AppResult<ZoneGrid> {
        let zone = zone_in_farm(&self.stores, farm_id, zone_id).await?;
        let trees = self.stores.trees.list_trees_by_zone(zone_id).await?;

        let trees_per_row = shared::trees_per_row(zone.width);
        let rows = shared::grid_rows(zone.length);

        Ok(ZoneGrid {
            zone_id,
            spacing: shared::SPACING,
            trees_per_row,
            rows,
            slot_capacity: u64::from(trees_per_row) * u64::from(rows),
            trees: trees.into_iter().map(|tree| place(&zone, tree)).collect(),
        })
    }
}
