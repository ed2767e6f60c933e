//! Irrigation zone service: admission checks and zone lifecycle

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{AdmissionDecision, IrrigationMode, Zone};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::FarmLocks;
use crate::store::Stores;

/// Zone service for managing a farm's irrigation zones
#[derive(Clone)]
pub struct ZoneService {
    stores: Stores,
    locks: Arc<FarmLocks>,
}

/// Input for creating a zone
#[derive(Debug, Deserialize, Validate)]
pub struct CreateZoneInput {
    #[validate(length(max = 120, message = "Zone name must be at most 120 characters"))]
    pub name: String,
    pub crop_type: Option<String>,
    pub width: Decimal,
    pub length: Decimal,
    #[serde(default)]
    pub x: Decimal,
    #[serde(default)]
    pub y: Decimal,
    #[serde(default)]
    pub mode: IrrigationMode,
    pub moisture_threshold: Option<i32>,
}

/// Dimensions of a prospective zone
#[derive(Debug, Deserialize)]
pub struct AdmissionInput {
    pub width: Decimal,
    pub length: Decimal,
}

/// Resolve a zone and check that it belongs to `farm_id`
pub(crate) async fn zone_in_farm(stores: &Stores, farm_id: Uuid, zone_id: Uuid) -> AppResult<Zone> {
    let zone = stores.zones.get_zone(zone_id).await?;
    if zone.farm_id != farm_id {
        return Err(AppError::NotFound("Zone".to_string()));
    }
    Ok(zone)
}

fn validate_dimensions(width: Decimal, length: Decimal) -> AppResult<()> {
    shared::validate_dimension(width).map_err(|msg| {
        AppError::invalid("width", msg, "La largeur doit être positive, inférieure à 10 milliards de mètres, avec au plus deux décimales")
    })?;
    shared::validate_dimension(length).map_err(|msg| {
        AppError::invalid("length", msg, "La longueur doit être positive, inférieure à 10 milliards de mètres, avec au plus deux décimales")
    })?;
    Ok(())
}

impl ZoneService {
    /// Create a new ZoneService instance
    pub fn new(stores: Stores, locks: Arc<FarmLocks>) -> Self {
        Self { stores, locks }
    }

    /// Load the farm and its zones and evaluate `candidate_area` against them
    async fn evaluate(&self, farm_id: Uuid, candidate_area: Decimal) -> AppResult<AdmissionDecision> {
        let farm = self.stores.farms.get_farm(farm_id).await?;
        let zones = self.stores.zones.list_zones_by_farm(farm_id).await?;
        let decision = shared::evaluate_admission(&farm, &zones, candidate_area)?;

        tracing::debug!(
            %farm_id,
            admitted = decision.admitted,
            farm_area = %decision.farm_area,
            used_area = %decision.used_area,
            candidate_area = %decision.candidate_area,
            "Zone admission evaluated"
        );

        Ok(decision)
    }

    /// Whether a zone of `candidate_area` m² still fits in the farm
    pub async fn can_admit_zone(&self, farm_id: Uuid, candidate_area: Decimal) -> AppResult<bool> {
        Ok(self.evaluate(farm_id, candidate_area).await?.admitted)
    }

    /// Run the admission check for a prospective zone without creating it
    pub async fn preview_admission(
        &self,
        farm_id: Uuid,
        input: AdmissionInput,
    ) -> AppResult<AdmissionDecision> {
        validate_dimensions(input.width, input.length)?;
        let candidate_area = shared::surface(input.width, input.length)?;
        self.evaluate(farm_id, candidate_area).await
    }

    /// Get all zones of a farm
    pub async fn list_zones(&self, farm_id: Uuid) -> AppResult<Vec<Zone>> {
        self.stores.farms.get_farm(farm_id).await?;
        self.stores.zones.list_zones_by_farm(farm_id).await
    }

    /// Get a zone of a farm
    pub async fn get_zone(&self, farm_id: Uuid, zone_id: Uuid) -> AppResult<Zone> {
        zone_in_farm(&self.stores, farm_id, zone_id).await
    }

    /// Create a zone if the farm has room for it
    pub async fn create_zone(&self, farm_id: Uuid, input: CreateZoneInput) -> AppResult<Zone> {
        input.validate()?;

        shared::validate_name(&input.name).map_err(|msg| {
            AppError::invalid("name", msg, "Le nom de la zone ne peut pas être vide")
        })?;
        validate_dimensions(input.width, input.length)?;
        shared::validate_offset(input.x).map_err(|msg| {
            AppError::invalid("x", msg, "La position x doit être positive ou nulle, avec au plus deux décimales")
        })?;
        shared::validate_offset(input.y).map_err(|msg| {
            AppError::invalid("y", msg, "La position y doit être positive ou nulle, avec au plus deux décimales")
        })?;
        if let Some(threshold) = input.moisture_threshold {
            shared::validate_moisture_threshold(threshold).map_err(|msg| {
                AppError::invalid(
                    "moisture_threshold",
                    msg,
                    "Le seuil d'humidité doit être compris entre 0 et 100",
                )
            })?;
        }

        let _guard = self.locks.acquire(farm_id).await;

        let candidate_area = shared::surface(input.width, input.length)?;
        let decision = self.evaluate(farm_id, candidate_area).await?;
        if !decision.admitted {
            return Err(AppError::CapacityExceeded {
                farm_area: decision.farm_area,
                used_area: decision.used_area,
                candidate_area: decision.candidate_area,
            });
        }

        let zone = self
            .stores
            .zones
            .insert_zone(Zone {
                id: Uuid::new_v4(),
                farm_id,
                name: input.name.trim().to_string(),
                crop_type: input.crop_type,
                width: input.width,
                length: input.length,
                x: input.x,
                y: input.y,
                mode: input.mode,
                moisture_threshold: input.moisture_threshold,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(%farm_id, zone_id = %zone.id, area = %candidate_area, "Zone created");
        Ok(zone)
    }

    /// Delete a zone; with `cascade` its trees go first
    pub async fn delete_zone(&self, farm_id: Uuid, zone_id: Uuid, cascade: bool) -> AppResult<()> {
        zone_in_farm(&self.stores, farm_id, zone_id).await?;

        if cascade {
            self.stores.zones.delete_zone_cascade(zone_id).await?;
        } else {
            self.stores.zones.delete_zone(zone_id).await?;
        }

        tracing::info!(%farm_id, %zone_id, cascade, "Zone deleted");
        Ok(())
    }
}
