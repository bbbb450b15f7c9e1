use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Public identifier (UUID) referenced by farms and employees
    #[sea_orm(unique)]
    pub user_id: String,

    pub first_name: String,

    pub last_name: String,

    /// Login identity. Unique among rows where `deleted_at` is null.
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    pub role: String,

    pub phone_number: String,

    pub address: String,

    pub active: bool,

    /// Six-digit password reset code
    pub otp_code: Option<String>,

    pub otp_expires_at: Option<String>,

    pub created_at: String,

    pub updated_at: String,

    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::farms::Entity")]
    Farms,
}

impl Related<super::farms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
