use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::Expr,
};
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};
use crate::models::account::{Account, NewAccount, ResetCode};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn find_live_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        Users::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await
            .context("Failed to query user by email")
    }

    async fn find_live_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        Users::find_by_id(id)
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")
    }

    /// Get a non-deleted account by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.find_live_by_email(email).await?.map(Account::from))
    }

    /// Get a non-deleted account by numeric primary key
    pub async fn get_by_id(&self, id: i32) -> Result<Option<Account>> {
        Ok(self.find_live_by_id(id).await?.map(Account::from))
    }

    /// Get a non-deleted account by its public UUID
    pub async fn get_by_public_id(&self, user_id: &str) -> Result<Option<Account>> {
        let user = Users::find()
            .filter(users::Column::UserId.eq(user_id))
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.conn)
            .await
            .context("Failed to query user by public ID")?;

        Ok(user.map(Account::from))
    }

    /// Insert a new account, hashing the plaintext password first
    pub async fn insert(&self, account: NewAccount, security: &SecurityConfig) -> Result<Account> {
        let password_hash = hash_on_blocking(account.password, security.clone()).await?;

        let now = Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            user_id: Set(uuid::Uuid::new_v4().to_string()),
            first_name: Set(account.first_name),
            last_name: Set(account.last_name),
            email: Set(account.email),
            password_hash: Set(password_hash),
            role: Set(account.role),
            phone_number: Set(account.phone_number),
            address: Set(account.address),
            active: Set(true),
            otp_code: Set(None),
            otp_expires_at: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        info!(user_id = %model.user_id, "Created account");

        Ok(Account::from(model))
    }

    /// Verify a password for the account registered under `email`.
    ///
    /// Returns the account only when it exists and the password matches.
    /// An unknown email still pays for one Argon2 run with the configured
    /// params, so both failures take the same time.
    pub async fn verify_password(
        &self,
        email: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<Account>> {
        let Some(user) = self.find_live_by_email(email).await? else {
            hash_on_blocking(password.to_string(), security.clone()).await?;
            return Ok(None);
        };

        let is_valid = verify_hash(user.password_hash.clone(), password.to_string()).await?;

        Ok(is_valid.then(|| Account::from(user)))
    }

    /// Verify a password for the account with the given primary key
    pub async fn verify_password_by_id(&self, id: i32, password: &str) -> Result<bool> {
        let Some(user) = self.find_live_by_id(id).await? else {
            return Ok(false);
        };

        verify_hash(user.password_hash, password.to_string()).await
    }

    /// Replace the password hash and clear any outstanding reset code
    pub async fn update_password(
        &self,
        id: i32,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        let user = self
            .find_live_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let new_hash = hash_on_blocking(new_password.to_string(), security.clone()).await?;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.otp_code = Set(None);
        active.otp_expires_at = Set(None);
        active.updated_at = Set(Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Get the account registered under `email` together with its stored reset code
    pub async fn get_reset_code(
        &self,
        email: &str,
    ) -> Result<Option<(Account, Option<ResetCode>)>> {
        let Some(user) = self.find_live_by_email(email).await? else {
            return Ok(None);
        };

        let reset_code = match (&user.otp_code, &user.otp_expires_at) {
            (Some(code), Some(expires_at)) => Some(ResetCode {
                code: code.clone(),
                expires_at: DateTime::parse_from_rfc3339(expires_at)
                    .context("Invalid reset code expiry timestamp")?
                    .with_timezone(&Utc),
            }),
            _ => None,
        };

        Ok(Some((Account::from(user), reset_code)))
    }

    /// Store a reset code for the account, replacing any previous one
    pub async fn set_reset_code(&self, id: i32, reset_code: &ResetCode) -> Result<()> {
        let user = self
            .find_live_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let mut active: users::ActiveModel = user.into();
        active.otp_code = Set(Some(reset_code.code.clone()));
        active.otp_expires_at = Set(Some(reset_code.expires_at.to_rfc3339()));
        active.updated_at = Set(Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Mark the account inactive and soft-deleted
    pub async fn deactivate(&self, id: i32) -> Result<bool> {
        let now = Utc::now().to_rfc3339();

        let result = Users::update_many()
            .col_expr(users::Column::Active, Expr::value(false))
            .col_expr(users::Column::DeletedAt, Expr::value(now.clone()))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.conn)
            .await
            .context("Failed to deactivate user")?;

        Ok(result.rows_affected > 0)
    }
}

async fn hash_on_blocking(password: String, security: SecurityConfig) -> Result<String> {
    task::spawn_blocking(move || hash_password(&password, Some(&security)))
        .await
        .context("Password hashing task panicked")?
}

async fn verify_hash(password_hash: String, password: String) -> Result<bool> {
    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Hash a password using Argon2id.
/// Without a config the crate's default params are used.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_salted() {
        let config = SecurityConfig::default();
        let first = hash_password("correct horse", Some(&config)).unwrap();
        let second = hash_password("correct horse", Some(&config)).unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("correct horse"));
    }

    #[tokio::test]
    async fn test_verify_hash() {
        let hash = hash_password("s3cret-pass", None).unwrap();

        assert!(verify_hash(hash.clone(), "s3cret-pass".to_string()).await.unwrap());
        assert!(!verify_hash(hash, "wrong-pass".to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_on_blocking_uses_configured_params() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            ..SecurityConfig::default()
        };

        let hash = hash_on_blocking("s3cret-pass".to_string(), config)
            .await
            .unwrap();

        assert!(hash.contains("m=1024,t=1,p=1"));
        assert!(verify_hash(hash, "s3cret-pass".to_string()).await.unwrap());
    }
}
