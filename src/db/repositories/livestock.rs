use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use tracing::info;

use crate::entities::{livestock, prelude::*};
use crate::models::livestock::{Livestock as LivestockRecord, NewLivestock};

/// Repository for livestock operations
pub struct LivestockRepository {
    conn: DatabaseConnection,
}

impl LivestockRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_live(&self, livestock_id: &str) -> Result<Option<livestock::Model>> {
        Livestock::find()
            .filter(livestock::Column::LivestockId.eq(livestock_id))
            .filter(livestock::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await
            .context("Failed to query livestock")
    }

    pub async fn get(&self, livestock_id: &str) -> Result<Option<LivestockRecord>> {
        Ok(self.find_live(livestock_id).await?.map(LivestockRecord::from))
    }

    pub async fn list_for_farm(&self, farm_id: &str) -> Result<Vec<LivestockRecord>> {
        let rows = Livestock::find()
            .filter(livestock::Column::FarmId.eq(farm_id))
            .filter(livestock::Column::DeletedAt.is_null())
            .order_by_asc(livestock::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list livestock")?;

        Ok(rows.into_iter().map(LivestockRecord::from).collect())
    }

    pub async fn insert(&self, animals: NewLivestock) -> Result<LivestockRecord> {
        let now = Utc::now().to_rfc3339();

        let active = livestock::ActiveModel {
            livestock_id: Set(uuid::Uuid::new_v4().to_string()),
            farm_id: Set(animals.farm_id),
            livestock_type: Set(animals.livestock_type),
            count: Set(animals.count),
            acquisition_date: Set(animals.acquisition_date),
            health_status: Set(animals.health_status),
            notes: Set(animals.notes),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert livestock")?;

        info!(livestock_id = %model.livestock_id, farm_id = %model.farm_id, "Created livestock");
        Ok(LivestockRecord::from(model))
    }

    pub async fn update(&self, animals: &LivestockRecord) -> Result<LivestockRecord> {
        let row = self
            .find_live(&animals.livestock_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Livestock not found: {}", animals.livestock_id))?;

        let mut active: livestock::ActiveModel = row.into();
        active.livestock_type = Set(animals.livestock_type.clone());
        active.count = Set(animals.count);
        active.acquisition_date = Set(animals.acquisition_date.clone());
        active.health_status = Set(animals.health_status.clone());
        active.notes = Set(animals.notes.clone());
        active.updated_at = Set(Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update livestock")?;

        Ok(LivestockRecord::from(model))
    }

    pub async fn soft_delete(&self, livestock_id: &str) -> Result<bool> {
        let result = Livestock::update_many()
            .col_expr(
                livestock::Column::DeletedAt,
                Expr::value(Utc::now().to_rfc3339()),
            )
            .filter(livestock::Column::LivestockId.eq(livestock_id))
            .filter(livestock::Column::DeletedAt.is_null())
            .exec(&self.conn)
            .await
            .context("Failed to delete livestock")?;

        Ok(result.rows_affected > 0)
    }
}
