use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tracing::info;

use crate::entities::{farms, prelude::*};
use crate::models::farm::{Farm, NewFarm};

/// Repository for farm operations
pub struct FarmRepository {
    conn: DatabaseConnection,
}

impl FarmRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_live(&self, farm_id: &str) -> Result<Option<farms::Model>> {
        Farms::find()
            .filter(farms::Column::FarmId.eq(farm_id))
            .filter(farms::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await
            .context("Failed to query farm")
    }

    pub async fn get(&self, farm_id: &str) -> Result<Option<Farm>> {
        Ok(self.find_live(farm_id).await?.map(Farm::from))
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Farm>> {
        let rows = Farms::find()
            .filter(farms::Column::UserId.eq(user_id))
            .filter(farms::Column::DeletedAt.is_null())
            .order_by_asc(farms::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list farms")?;

        Ok(rows.into_iter().map(Farm::from).collect())
    }

    pub async fn insert(&self, farm: NewFarm) -> Result<Farm> {
        let now = Utc::now().to_rfc3339();

        let active = farms::ActiveModel {
            farm_id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(farm.name),
            description: Set(farm.description),
            location: Set(farm.location),
            size: Set(farm.size),
            farm_type: Set(farm.farm_type),
            status: Set(farm.status),
            user_id: Set(farm.user_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert farm")?;

        info!(farm_id = %model.farm_id, user_id = %model.user_id, "Created farm");
        Ok(Farm::from(model))
    }

    /// Persist the mutable fields of `farm`. The owner is never rewritten.
    pub async fn update(&self, farm: &Farm) -> Result<Farm> {
        let row = self
            .find_live(&farm.farm_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Farm not found: {}", farm.farm_id))?;

        let mut active: farms::ActiveModel = row.into();
        active.name = Set(farm.name.clone());
        active.description = Set(farm.description.clone());
        active.location = Set(farm.location.clone());
        active.size = Set(farm.size);
        active.farm_type = Set(farm.farm_type.clone());
        active.status = Set(farm.status.clone());
        active.updated_at = Set(Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update farm")?;

        Ok(Farm::from(model))
    }

    pub async fn soft_delete(&self, farm_id: &str) -> Result<bool> {
        let result = Farms::update_many()
            .col_expr(farms::Column::DeletedAt, Expr::value(Utc::now().to_rfc3339()))
            .filter(farms::Column::FarmId.eq(farm_id))
            .filter(farms::Column::DeletedAt.is_null())
            .exec(&self.conn)
            .await
            .context("Failed to delete farm")?;

        if result.rows_affected > 0 {
            info!(farm_id, "Deleted farm");
        }

        Ok(result.rows_affected > 0)
    }
}
