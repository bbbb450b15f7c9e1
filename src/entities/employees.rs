use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub employee_id: String,

    /// Optional link to an account. Does not affect who owns the record.
    pub user_id: Option<String>,

    pub farm_id: String,

    pub first_name: String,

    pub last_name: String,

    /// Job title
    pub position: String,

    pub salary: f64,

    pub hire_date: Option<String>,

    pub contact_info: String,

    /// Active, Inactive, Terminated
    pub status: String,

    pub created_at: String,

    pub updated_at: String,

    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farms::Entity",
        from = "Column::FarmId",
        to = "super::farms::Column::FarmId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Farms,
}

impl Related<super::farms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
