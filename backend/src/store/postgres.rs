//! PostgreSQL store adapter

use async_trait::async_trait;
use shared::{Farm, Tree, Zone};
use sqlx::PgPool;
use uuid::Uuid;

use super::{FarmStore, StoreHealth, TreeStore, ZoneStore};
use crate::error::{AppError, AppResult};

/// Store backed by the `farms`, `zones` and `trees` tables
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    /// Create a new PgStore instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FarmStore for PgStore {
    async fn get_farm(&self, farm_id: Uuid) -> AppResult<Farm> {
        sqlx::query_as::<_, Farm>(
            r#"
            SELECT id, owner_id, name, location, length, width, created_at
            FROM farms
            WHERE id = $1
            "#,
        )
        .bind(farm_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm".to_string()))
    }

    async fn list_farms_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Farm>> {
        let farms = sqlx::query_as::<_, Farm>(
            r#"
            SELECT id, owner_id, name, location, length, width, created_at
            FROM farms
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        Ok(farms)
    }

    async fn insert_farm(&self, farm: Farm) -> AppResult<Farm> {
        let farm = sqlx::query_as::<_, Farm>(
            r#"
            INSERT INTO farms (id, owner_id, name, location, length, width, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, name, location, length, width, created_at
            "#,
        )
        .bind(farm.id)
        .bind(farm.owner_id)
        .bind(&farm.name)
        .bind(&farm.location)
        .bind(farm.length)
        .bind(farm.width)
        .bind(farm.created_at)
        .fetch_one(&self.db)
        .await?;

        Ok(farm)
    }

    async fn update_farm(&self, farm: Farm) -> AppResult<Farm> {
        sqlx::query_as::<_, Farm>(
            r#"
            UPDATE farms
            SET name = $1, location = $2, length = $3, width = $4
            WHERE id = $5
            RETURNING id, owner_id, name, location, length, width, created_at
            "#,
        )
        .bind(&farm.name)
        .bind(&farm.location)
        .bind(farm.length)
        .bind(farm.width)
        .bind(farm.id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Farm".to_string()))
    }

    async fn delete_farm(&self, farm_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(farm_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Farm".to_string()));
        }

        Ok(())
    }

    async fn delete_farm_cascade(&self, farm_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            "DELETE FROM trees WHERE zone_id IN (SELECT id FROM zones WHERE farm_id = $1)",
        )
        .bind(farm_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM zones WHERE farm_id = $1")
            .bind(farm_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(farm_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // dropping the transaction rolls back the child deletes
            return Err(AppError::NotFound("Farm".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ZoneStore for PgStore {
    async fn get_zone(&self, zone_id: Uuid) -> AppResult<Zone> {
        sqlx::query_as::<_, Zone>(
            r#"
            SELECT id, farm_id, name, crop_type, width, length, x, y,
                   mode, moisture_threshold, created_at
            FROM zones
            WHERE id = $1
            "#,
        )
        .bind(zone_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Zone".to_string()))
    }

    async fn list_zones_by_farm(&self, farm_id: Uuid) -> AppResult<Vec<Zone>> {
        let zones = sqlx::query_as::<_, Zone>(
            r#"
            SELECT id, farm_id, name, crop_type, width, length, x, y,
                   mode, moisture_threshold, created_at
            FROM zones
            WHERE farm_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(farm_id)
        .fetch_all(&self.db)
        .await?;

        Ok(zones)
    }

    async fn insert_zone(&self, zone: Zone) -> AppResult<Zone> {
        let zone = sqlx::query_as::<_, Zone>(
            r#"
            INSERT INTO zones (id, farm_id, name, crop_type, width, length, x, y,
                               mode, moisture_threshold, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, farm_id, name, crop_type, width, length, x, y,
                      mode, moisture_threshold, created_at
            "#,
        )
        .bind(zone.id)
        .bind(zone.farm_id)
        .bind(&zone.name)
        .bind(&zone.crop_type)
        .bind(zone.width)
        .bind(zone.length)
        .bind(zone.x)
        .bind(zone.y)
        .bind(zone.mode)
        .bind(zone.moisture_threshold)
        .bind(zone.created_at)
        .fetch_one(&self.db)
        .await?;

        Ok(zone)
    }

    async fn delete_zone(&self, zone_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM zones WHERE id = $1")
            .bind(zone_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Zone".to_string()));
        }

        Ok(())
    }

    async fn delete_zone_cascade(&self, zone_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM trees WHERE zone_id = $1")
            .bind(zone_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM zones WHERE id = $1")
            .bind(zone_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Zone".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl TreeStore for PgStore {
    async fn get_tree(&self, tree_id: Uuid) -> AppResult<Tree> {
        sqlx::query_as::<_, Tree>(
            r#"
            SELECT id, zone_id, tree_code, row_number, index_in_row, health_status, last_seen_at
            FROM trees
            WHERE id = $1
            "#,
        )
        .bind(tree_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tree".to_string()))
    }

    async fn list_trees_by_zone(&self, zone_id: Uuid) -> AppResult<Vec<Tree>> {
        let trees = sqlx::query_as::<_, Tree>(
            r#"
            SELECT id, zone_id, tree_code, row_number, index_in_row, health_status, last_seen_at
            FROM trees
            WHERE zone_id = $1
            ORDER BY row_number ASC, index_in_row ASC, tree_code ASC
            "#,
        )
        .bind(zone_id)
        .fetch_all(&self.db)
        .await?;

        Ok(trees)
    }

    async fn insert_tree(&self, tree: Tree) -> AppResult<Tree> {
        let tree = sqlx::query_as::<_, Tree>(
            r#"
            INSERT INTO trees (id, zone_id, tree_code, row_number, index_in_row, health_status, last_seen_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, zone_id, tree_code, row_number, index_in_row, health_status, last_seen_at
            "#,
        )
        .bind(tree.id)
        .bind(tree.zone_id)
        .bind(&tree.tree_code)
        .bind(tree.row_number)
        .bind(tree.index_in_row)
        .bind(tree.health_status)
        .bind(tree.last_seen_at)
        .fetch_one(&self.db)
        .await?;

        Ok(tree)
    }

    async fn insert_trees(&self, trees: Vec<Tree>) -> AppResult<Vec<Tree>> {
        let mut tx = self.db.begin().await?;
        let mut created = Vec::with_capacity(trees.len());

        for tree in trees {
            let row = sqlx::query_as::<_, Tree>(
                r#"
                INSERT INTO trees (id, zone_id, tree_code, row_number, index_in_row, health_status, last_seen_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, zone_id, tree_code, row_number, index_in_row, health_status, last_seen_at
                "#,
            )
            .bind(tree.id)
            .bind(tree.zone_id)
            .bind(&tree.tree_code)
            .bind(tree.row_number)
            .bind(tree.index_in_row)
            .bind(tree.health_status)
            .bind(tree.last_seen_at)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn delete_tree(&self, tree_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM trees WHERE id = $1")
            .bind(tree_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Tree".to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
