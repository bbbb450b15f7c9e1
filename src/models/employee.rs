use serde::Serialize;

use crate::entities::employees;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(skip)]
    pub id: i32,
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub farm_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub salary: f64,
    pub hire_date: Option<String>,
    pub contact_info: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            user_id: model.user_id,
            farm_id: model.farm_id,
            first_name: model.first_name,
            last_name: model.last_name,
            position: model.position,
            salary: model.salary,
            hire_date: model.hire_date,
            contact_info: model.contact_info,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub farm_id: String,
    pub user_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub salary: f64,
    pub hire_date: Option<String>,
    pub contact_info: String,
    pub status: String,
}
