use serde::Serialize;

use crate::entities::farms;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    #[serde(skip)]
    pub id: i32,
    pub farm_id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub size: f64,
    pub farm_type: String,
    pub status: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<farms::Model> for Farm {
    fn from(model: farms::Model) -> Self {
        Self {
            id: model.id,
            farm_id: model.farm_id,
            name: model.name,
            description: model.description,
            location: model.location,
            size: model.size,
            farm_type: model.farm_type,
            status: model.status,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewFarm {
    pub name: String,
    pub description: String,
    pub location: String,
    pub size: f64,
    pub farm_type: String,
    pub status: String,
    pub user_id: String,
}
