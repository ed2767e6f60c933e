//! HTTP handlers for tree placement endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::Tree;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::tree::{BulkPlacementInput, CreateTreesRequest, TreeService, ZoneGrid};
use crate::AppState;

/// List trees of a zone in grid order
pub async fn list_trees(
    State(state): State<AppState>,
    Path((farm_id, zone_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Vec<Tree>>> {
    let service = TreeService::new(state.stores);
    let trees = service.list_trees(farm_id, zone_id).await?;
    Ok(Json(trees))
}

/// Place one tree, or an array of trees as a batch.
///
/// The response mirrors the request shape: an object for a single tree,
/// an array for a batch.
pub async fn create_trees(
    State(state): State<AppState>,
    Path((farm_id, zone_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<CreateTreesRequest>,
) -> AppResult<Response> {
    let service = TreeService::new(state.stores);
    let response = match request {
        CreateTreesRequest::Single(input) => {
            let tree = service.place_single_tree(farm_id, zone_id, input).await?;
            (StatusCode::CREATED, Json(tree)).into_response()
        }
        batch => {
            let trees = service.create_trees(farm_id, zone_id, batch).await?;
            (StatusCode::CREATED, Json(trees)).into_response()
        }
    };
    Ok(response)
}

/// Lay out many trees row by row
pub async fn place_trees_bulk(
    State(state): State<AppState>,
    Path((farm_id, zone_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<BulkPlacementInput>,
) -> AppResult<(StatusCode, Json<Vec<Tree>>)> {
    let service = TreeService::new(state.stores);
    let trees = service.place_trees_bulk(farm_id, zone_id, input).await?;
    Ok((StatusCode::CREATED, Json(trees)))
}

/// Delete a tree
pub async fn delete_tree(
    State(state): State<AppState>,
    Path((farm_id, zone_id, tree_id)): Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let service = TreeService::new(state.stores);
    service.delete_tree(farm_id, zone_id, tree_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Planting grid of a zone with tree positions
pub async fn get_zone_grid(
    State(state): State<AppState>,
    Path((farm_id, zone_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ZoneGrid>> {
    let service = TreeService::new(state.stores);
    let grid = service.zone_grid(farm_id, zone_id).await?;
    Ok(Json(grid))
}
