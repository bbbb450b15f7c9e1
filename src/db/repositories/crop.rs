use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tracing::info;

use crate::entities::{crops, prelude::*};
use crate::models::crop::{Crop, NewCrop};

/// Repository for crop operations
pub struct CropRepository {
    conn: DatabaseConnection,
}

impl CropRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_live(&self, crop_id: &str) -> Result<Option<crops::Model>> {
        Crops::find()
            .filter(crops::Column::CropId.eq(crop_id))
            .filter(crops::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await
            .context("Failed to query crop")
    }

    pub async fn get(&self, crop_id: &str) -> Result<Option<Crop>> {
        Ok(self.find_live(crop_id).await?.map(Crop::from))
    }

    pub async fn list_for_farm(&self, farm_id: &str) -> Result<Vec<Crop>> {
        let rows = Crops::find()
            .filter(crops::Column::FarmId.eq(farm_id))
            .filter(crops::Column::DeletedAt.is_null())
            .order_by_asc(crops::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list crops")?;

        Ok(rows.into_iter().map(Crop::from).collect())
    }

    pub async fn insert(&self, crop: NewCrop) -> Result<Crop> {
        let now = Utc::now().to_rfc3339();

        let active = crops::ActiveModel {
            crop_id: Set(uuid::Uuid::new_v4().to_string()),
            farm_id: Set(crop.farm_id),
            name: Set(crop.name),
            planting_date: Set(crop.planting_date),
            harvest_date: Set(crop.harvest_date),
            quantity: Set(crop.quantity),
            status: Set(crop.status),
            notes: Set(crop.notes),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert crop")?;

        info!(crop_id = %model.crop_id, farm_id = %model.farm_id, "Created crop");
        Ok(Crop::from(model))
    }

    pub async fn update(&self, crop: &Crop) -> Result<Crop> {
        let row = self
            .find_live(&crop.crop_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Crop not found: {}", crop.crop_id))?;

        let mut active: crops::ActiveModel = row.into();
        active.name = Set(crop.name.clone());
        active.planting_date = Set(crop.planting_date.clone());
        active.harvest_date = Set(crop.harvest_date.clone());
        active.quantity = Set(crop.quantity);
        active.status = Set(crop.status.clone());
        active.notes = Set(crop.notes.clone());
        active.updated_at = Set(Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update crop")?;

        Ok(Crop::from(model))
    }

    pub async fn soft_delete(&self, crop_id: &str) -> Result<bool> {
        let result = Crops::update_many()
            .col_expr(crops::Column::DeletedAt, Expr::value(Utc::now().to_rfc3339()))
            .filter(crops::Column::CropId.eq(crop_id))
            .filter(crops::Column::DeletedAt.is_null())
            .exec(&self.conn)
            .await
            .context("Failed to delete crop")?;

        Ok(result.rows_affected > 0)
    }
}
