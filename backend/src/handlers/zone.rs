//! HTTP handlers for irrigation zone endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared::{AdmissionDecision, Zone};
use uuid::Uuid;

use super::DeleteQuery;
use crate::error::AppResult;
use crate::services::zone::{AdmissionInput, CreateZoneInput, ZoneService};
use crate::AppState;

fn service(state: &AppState) -> ZoneService {
    ZoneService::new(state.stores.clone(), state.farm_locks.clone())
}

/// List zones of a farm
pub async fn list_zones(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
) -> AppResult<Json<Vec<Zone>>> {
    let zones = service(&state).list_zones(farm_id).await?;
    Ok(Json(zones))
}

/// Create a zone if the farm has room for it
pub async fn create_zone(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Json(input): Json<CreateZoneInput>,
) -> AppResult<(StatusCode, Json<Zone>)> {
    let zone = service(&state).create_zone(farm_id, input).await?;
    Ok((StatusCode::CREATED, Json(zone)))
}

/// Check whether a zone would be admitted, without creating it
pub async fn preview_admission(
    State(state): State<AppState>,
    Path(farm_id): Path<Uuid>,
    Json(input): Json<AdmissionInput>,
) -> AppResult<Json<AdmissionDecision>> {
    let decision = service(&state).preview_admission(farm_id, input).await?;
    Ok(Json(decision))
}

/// Get a zone by ID
pub async fn get_zone(
    State(state): State<AppState>,
    Path((farm_id, zone_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Zone>> {
    let zone = service(&state).get_zone(farm_id, zone_id).await?;
    Ok(Json(zone))
}

/// Delete a zone
pub async fn delete_zone(
    State(state): State<AppState>,
    Path((farm_id, zone_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<StatusCode> {
    service(&state)
        .delete_zone(farm_id, zone_id, query.cascade)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
