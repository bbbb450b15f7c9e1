use serde::Serialize;

use crate::entities::users;

/// Account data returned from the store. Never carries the password hash
/// or the reset code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(skip)]
    pub id: i32,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub phone_number: String,
    pub address: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            role: model.role,
            phone_number: model.phone_number,
            address: model.address,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Fields accepted when registering an account. `password` is plaintext and
/// is hashed by the repository before anything is written.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub phone_number: String,
    pub address: String,
}

/// Stored reset code for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetCode {
    pub code: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
