use crate::config::SecurityConfig;
use crate::models::account::{Account, NewAccount, ResetCode};
use crate::models::crop::{Crop, NewCrop};
use crate::models::employee::{Employee, NewEmployee};
use crate::models::farm::{Farm, NewFarm};
use crate::models::livestock::{Livestock, NewLivestock};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn farm_repo(&self) -> repositories::farm::FarmRepository {
        repositories::farm::FarmRepository::new(self.conn.clone())
    }

    fn crop_repo(&self) -> repositories::crop::CropRepository {
        repositories::crop::CropRepository::new(self.conn.clone())
    }

    fn livestock_repo(&self) -> repositories::livestock::LivestockRepository {
        repositories::livestock::LivestockRepository::new(self.conn.clone())
    }

    fn employee_repo(&self) -> repositories::employee::EmployeeRepository {
        repositories::employee::EmployeeRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_account_by_id(&self, id: i32) -> Result<Option<Account>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_account_by_public_id(&self, user_id: &str) -> Result<Option<Account>> {
        self.user_repo().get_by_public_id(user_id).await
    }

    pub async fn create_account(
        &self,
        account: NewAccount,
        security: &SecurityConfig,
    ) -> Result<Account> {
        self.user_repo().insert(account, security).await
    }

    pub async fn verify_account_password(
        &self,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<Account>> {
        self.user_repo()
            .verify_password(email, password, security)
            .await
    }

    pub async fn verify_account_password_by_id(&self, id: i32, password: &str) -> Result<bool> {
        self.user_repo().verify_password_by_id(id, password).await
    }

    pub async fn update_account_password(
        &self,
        id: i32,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(id, new_password, security)
            .await
    }

    pub async fn get_reset_code(
        &self,
        email: &str,
    ) -> Result<Option<(Account, Option<ResetCode>)>> {
        self.user_repo().get_reset_code(email).await
    }

    pub async fn set_reset_code(&self, id: i32, reset_code: &ResetCode) -> Result<()> {
        self.user_repo().set_reset_code(id, reset_code).await
    }

    pub async fn deactivate_account(&self, id: i32) -> Result<bool> {
        self.user_repo().deactivate(id).await
    }

    // ========================================================================
    // Farms
    // ========================================================================

    pub async fn get_farm(&self, farm_id: &str) -> Result<Option<Farm>> {
        self.farm_repo().get(farm_id).await
    }

    pub async fn list_farms_for_user(&self, user_id: &str) -> Result<Vec<Farm>> {
        self.farm_repo().list_for_user(user_id).await
    }

    pub async fn create_farm(&self, farm: NewFarm) -> Result<Farm> {
        self.farm_repo().insert(farm).await
    }

    pub async fn update_farm(&self, farm: &Farm) -> Result<Farm> {
        self.farm_repo().update(farm).await
    }

    pub async fn delete_farm(&self, farm_id: &str) -> Result<bool> {
        self.farm_repo().soft_delete(farm_id).await
    }

    // ========================================================================
    // Crops
    // ========================================================================

    pub async fn get_crop(&self, crop_id: &str) -> Result<Option<Crop>> {
        self.crop_repo().get(crop_id).await
    }

    pub async fn list_crops_for_farm(&self, farm_id: &str) -> Result<Vec<Crop>> {
        self.crop_repo().list_for_farm(farm_id).await
    }

    pub async fn create_crop(&self, crop: NewCrop) -> Result<Crop> {
        self.crop_repo().insert(crop).await
    }

    pub async fn update_crop(&self, crop: &Crop) -> Result<Crop> {
        self.crop_repo().update(crop).await
    }

    pub async fn delete_crop(&self, crop_id: &str) -> Result<bool> {
        self.crop_repo().soft_delete(crop_id).await
    }

    // ========================================================================
    // Livestock
    // ========================================================================

    pub async fn get_livestock(&self, livestock_id: &str) -> Result<Option<Livestock>> {
        self.livestock_repo().get(livestock_id).await
    }

    pub async fn list_livestock_for_farm(&self, farm_id: &str) -> Result<Vec<Livestock>> {
        self.livestock_repo().list_for_farm(farm_id).await
    }

    pub async fn create_livestock(&self, animals: NewLivestock) -> Result<Livestock> {
        self.livestock_repo().insert(animals).await
    }

    pub async fn update_livestock(&self, animals: &Livestock) -> Result<Livestock> {
        self.livestock_repo().update(animals).await
    }

    pub async fn delete_livestock(&self, livestock_id: &str) -> Result<bool> {
        self.livestock_repo().soft_delete(livestock_id).await
    }

    // ========================================================================
    // Employees
    // ========================================================================

    pub async fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>> {
        self.employee_repo().get(employee_id).await
    }

    pub async fn list_employees_for_farm(&self, farm_id: &str) -> Result<Vec<Employee>> {
        self.employee_repo().list_for_farm(farm_id).await
    }

    pub async fn create_employee(&self, employee: NewEmployee) -> Result<Employee> {
        self.employee_repo().insert(employee).await
    }

    pub async fn update_employee(&self, employee: &Employee) -> Result<Employee> {
        self.employee_repo().update(employee).await
    }

    pub async fn delete_employee(&self, employee_id: &str) -> Result<bool> {
        self.employee_repo().soft_delete(employee_id).await
    }
}
