use serde::Serialize;

use crate::entities::crops;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    #[serde(skip)]
    pub id: i32,
    pub crop_id: String,
    pub farm_id: String,
    pub name: String,
    pub planting_date: Option<String>,
    pub harvest_date: Option<String>,
    pub quantity: f64,
    pub status: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crops::Model> for Crop {
    fn from(model: crops::Model) -> Self {
        Self {
            id: model.id,
            crop_id: model.crop_id,
            farm_id: model.farm_id,
            name: model.name,
            planting_date: model.planting_date,
            harvest_date: model.harvest_date,
            quantity: model.quantity,
            status: model.status,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCrop {
    pub farm_id: String,
    pub name: String,
    pub planting_date: Option<String>,
    pub harvest_date: Option<String>,
    pub quantity: f64,
    pub status: String,
    pub notes: String,
}
