use serde::Serialize;

use crate::entities::livestock;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Livestock {
    #[serde(skip)]
    pub id: i32,
    pub livestock_id: String,
    pub farm_id: String,
    #[serde(rename = "type")]
    pub livestock_type: String,
    pub count: i32,
    pub acquisition_date: Option<String>,
    pub health_status: String,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<livestock::Model> for Livestock {
    fn from(model: livestock::Model) -> Self {
        Self {
            id: model.id,
            livestock_id: model.livestock_id,
            farm_id: model.farm_id,
            livestock_type: model.livestock_type,
            count: model.count,
            acquisition_date: model.acquisition_date,
            health_status: model.health_status,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewLivestock {
    pub farm_id: String,
    pub livestock_type: String,
    pub count: i32,
    pub acquisition_date: Option<String>,
    pub health_status: String,
    pub notes: String,
}
