//! HTTP handlers for farm endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{Farm, FarmCapacity};
use uuid::Uuid;

use super::DeleteQuery;
use crate::error::AppResult;
use crate::services::farm::{CreateFarmInput, FarmService, UpdateFarmInput};
use crate::AppState;

fn service(state: &AppState) -> FarmService {
    FarmService::new(state.stores.clone(), state.farm_locks.clone())
}

/// Query parameters for listing farms
#[derive(Debug, Deserialize)]
pub struct ListFarmsQuery {
    pub owner_id: Uuid,
}

/// List farms of an owner
pub async fn list_farms(
    State(state): State<AppState>,
    Query(query): Query<ListFarmsQuery>,
) -> AppResult<Json<Vec<Farm>>> {
    let farms = service(&state).list_farms(query.owner_id).await?;
    Ok(Json(farms))
}

/// Create a new farm
pub async fn create_farm(
    State(state): State<AppState>,
    Json(input): Json<CreateFarmInput>,
) -> AppResult<(StatusCode, Json<Farm>)> {
    let farm = service(&state).create_farm(input).await?;
    Ok((StatusCode::CREATED, Json(farm)))
}

/// Get a farm by ID
pub async fn get_farm(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
) -> AppResult<Json<Farm>> {
    let farm = service(&state).get_farm(farm_id).await?;
    Ok(Json(farm))
}

/// Update a farm
pub async fn update_farm(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Json(input): Json<UpdateFarmInput>,
) -> AppResult<Json<Farm>> {
    let farm = service(&state).update_farm(farm_id, input).await?;
    Ok(Json(farm))
}

/// Delete a farm
pub async fn delete_farm(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<StatusCode> {
    service(&state).delete_farm(farm_id, query.cascade).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Allocation summary of a farm
pub async fn get_farm_capacity(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
) -> AppResult<Json<FarmCapacity>> {
    let capacity = service(&state).get_capacity(farm_id).await?;
    Ok(Json(capacity))
}
