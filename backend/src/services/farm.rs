//! Farm service

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{Farm, FarmCapacity};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::FarmLocks;
use crate::store::Stores;

/// Farm service for managing farms and their capacity
#[derive(Clone)]
pub struct FarmService {
    stores: Stores,
    locks: Arc<FarmLocks>,
}

/// Input for creating a farm
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFarmInput {
    pub owner_id: Uuid,
    #[validate(length(max = 120, message = "Farm name must be at most 120 characters"))]
    pub name: String,
    pub location: Option<String>,
    #[serde(alias = "longueur")]
    pub length: Decimal,
    #[serde(alias = "largeur")]
    pub width: Decimal,
}

/// Input for updating a farm; absent fields keep their value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFarmInput {
    #[validate(length(max = 120, message = "Farm name must be at most 120 characters"))]
    pub name: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "longueur")]
    pub length: Option<Decimal>,
    #[serde(alias = "largeur")]
    pub width: Option<Decimal>,
}

fn check_name(name: &str) -> AppResult<()> {
    shared::validate_name(name)
        .map_err(|msg| AppError::invalid("name", msg, "Le nom de la ferme ne peut pas être vide"))
}

fn check_length(length: Decimal) -> AppResult<()> {
    shared::validate_dimension(length).map_err(|msg| {
        AppError::invalid("length", msg, "La longueur doit être positive, inférieure à 10 milliards de mètres, avec au plus deux décimales")
    })
}

fn check_width(width: Decimal) -> AppResult<()> {
    shared::validate_dimension(width).map_err(|msg| {
        AppError::invalid("width", msg, "La largeur doit être positive, inférieure à 10 milliards de mètres, avec au plus deux décimales")
    })
}

impl FarmService {
    /// Create a new FarmService instance
    pub fn new(stores: Stores, locks: Arc<FarmLocks>) -> Self {
        Self { stores, locks }
    }

    /// Get all farms of an owner, newest first
    pub async fn list_farms(&self, owner_id: Uuid) -> AppResult<Vec<Farm>> {
        self.stores.farms.list_farms_by_owner(owner_id).await
    }

    /// Get a farm by ID
    pub async fn get_farm(&self, farm_id: Uuid) -> AppResult<Farm> {
        self.stores.farms.get_farm(farm_id).await
    }

    /// Create a new farm
    pub async fn create_farm(&self, input: CreateFarmInput) -> AppResult<Farm> {
        input.validate()?;
        check_name(&input.name)?;
        check_length(input.length)?;
        check_width(input.width)?;
        let area = shared::surface(input.width, input.length)?;

        let farm = self
            .stores
            .farms
            .insert_farm(Farm {
                id: Uuid::new_v4(),
                owner_id: input.owner_id,
                name: input.name.trim().to_string(),
                location: input.location,
                length: input.length,
                width: input.width,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(farm_id = %farm.id, owner_id = %farm.owner_id, %area, "Farm created");
        Ok(farm)
    }

    /// Update a farm. A resize may not leave the farm smaller than its zones.
    pub async fn update_farm(&self, farm_id: Uuid, input: UpdateFarmInput) -> AppResult<Farm> {
        input.validate()?;
        if let Some(name) = &input.name {
            check_name(name)?;
        }
        if let Some(length) = input.length {
            check_length(length)?;
        }
        if let Some(width) = input.width {
            check_width(width)?;
        }

        let _guard = self.locks.acquire(farm_id).await;

        let mut farm = self.stores.farms.get_farm(farm_id).await?;
        if let Some(name) = input.name {
            farm.name = name.trim().to_string();
        }
        if let Some(location) = input.location {
            farm.location = Some(location);
        }
        farm.length = input.length.unwrap_or(farm.length);
        farm.width = input.width.unwrap_or(farm.width);

        let zones = self.stores.zones.list_zones_by_farm(farm_id).await?;
        let farm_area = farm.area()?;
        let used_area = shared::used_area(&zones)?;
        if !shared::fits_within(farm_area, used_area, Decimal::ZERO) {
            return Err(AppError::CapacityExceeded {
                farm_area,
                used_area,
                candidate_area: Decimal::ZERO,
            });
        }

        let farm = self.stores.farms.update_farm(farm).await?;
        tracing::info!(%farm_id, area = %farm_area, "Farm updated");
        Ok(farm)
    }

    /// Delete a farm; with `cascade` its zones and trees go first
    pub async fn delete_farm(&self, farm_id: Uuid, cascade: bool) -> AppResult<()> {
        let _guard = self.locks.acquire(farm_id).await;
        if cascade {
            self.stores.farms.delete_farm_cascade(farm_id).await?;
        } else {
            self.stores.farms.delete_farm(farm_id).await?;
        }

        tracing::info!(%farm_id, cascade, "Farm deleted");
        Ok(())
    }

    /// Allocation summary of a farm
    pub async fn get_capacity(&self, farm_id: Uuid) -> AppResult<FarmCapacity> {
        let farm = self.stores.farms.get_farm(farm_id).await?;
        let zones = self.stores.zones.list_zones_by_farm(farm_id).await?;
        Ok(shared::farm_capacity(&farm, &zones)?)
    }
}
