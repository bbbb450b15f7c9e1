//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{DbErr, SqlErr};
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::models::account::{Account, NewAccount, ResetCode};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, SignupInput};
use crate::services::reset_code::{ResetCodeSender, generate_code};
use crate::services::token::{AuthUser, TokenService};

const DEFAULT_ROLE: &str = "Farmer";

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenService>,
    security: SecurityConfig,
    sender: Arc<dyn ResetCodeSender>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(
        store: Store,
        tokens: Arc<TokenService>,
        security: SecurityConfig,
        sender: Arc<dyn ResetCodeSender>,
    ) -> Self {
        Self {
            store,
            tokens,
            security,
            sender,
        }
    }

    fn check_password_length(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.security.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                self.security.min_password_length
            )));
        }
        Ok(())
    }

    fn issue(&self, account: Account) -> Result<LoginResult, AuthError> {
        let token = self.tokens.issue(&account)?;
        Ok(LoginResult {
            user: account,
            token,
        })
    }

    async fn active_account(&self, caller: &AuthUser) -> Result<Account, AuthError> {
        self.store
            .get_account_by_id(caller.id)
            .await?
            .filter(|account| account.active && account.email == caller.email)
            .ok_or(AuthError::AccountInactiveOrMissing)
    }

    /// Same as [`AuthService::request_password_reset`] with an explicit clock.
    pub async fn request_password_reset_at(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let Some(account) = self.store.get_account_by_email(email).await? else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };

        let expires_at = Duration::try_minutes(self.security.reset_code_ttl_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::Internal("Reset code lifetime is out of range".to_string()))?;

        let reset_code = ResetCode {
            code: generate_code(),
            expires_at,
        };

        self.store.set_reset_code(account.id, &reset_code).await?;
        self.sender
            .send(&account.email, &reset_code.code, reset_code.expires_at)
            .await?;

        info!(user_id = %account.user_id, "Password reset code generated");
        Ok(())
    }

    /// Same as [`AuthService::reset_password`] with an explicit clock.
    pub async fn reset_password_at(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        self.check_password_length(new_password)?;

        let (account, stored) = self
            .store
            .get_reset_code(email)
            .await?
            .ok_or(AuthError::InvalidOrExpiredCode)?;

        let stored = stored.ok_or(AuthError::InvalidOrExpiredCode)?;

        if !constant_time_eq(&stored.code, code) || now > stored.expires_at {
            warn!(user_id = %account.user_id, "Rejected password reset attempt");
            return Err(AuthError::InvalidOrExpiredCode);
        }

        self.store
            .update_account_password(account.id, new_password, &self.security)
            .await?;

        info!(user_id = %account.user_id, "Password reset completed");
        Ok(())
    }
}

/// Compare two codes without short-circuiting on the first differing byte.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DbErr>()
        .and_then(DbErr::sql_err)
        .is_some_and(|e| matches!(e, SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(&self, input: SignupInput) -> Result<LoginResult, AuthError> {
        self.check_password_length(&input.password)?;

        if self.store.get_account_by_email(&input.email).await?.is_some() {
            return Err(AuthError::DuplicateIdentity);
        }

        let role = input
            .role
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let new_account = NewAccount {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password: input.password,
            role,
            phone_number: input.phone_number.unwrap_or_default(),
            address: input.address.unwrap_or_default(),
        };

        // The partial unique index catches a concurrent signup that slipped
        // past the lookup above.
        let account = match self.store.create_account(new_account, &self.security).await {
            Ok(account) => account,
            Err(e) if is_unique_violation(&e) => return Err(AuthError::DuplicateIdentity),
            Err(e) => return Err(e.into()),
        };

        self.issue(account)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let account = self
            .store
            .verify_account_password(email, password, &self.security)
            .await?
            .filter(|account| account.active)
            .ok_or(AuthError::InvalidCredentials)?;

        info!(user_id = %account.user_id, "Login succeeded");
        self.issue(account)
    }

    async fn refresh_token(&self, caller: &AuthUser) -> Result<LoginResult, AuthError> {
        let account = self.active_account(caller).await?;
        self.issue(account)
    }

    async fn current_account(&self, caller: &AuthUser) -> Result<Account, AuthError> {
        self.active_account(caller).await
    }

    async fn change_password(
        &self,
        caller: &AuthUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.check_password_length(new_password)?;

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let account = self.active_account(caller).await?;

        let is_valid = self
            .store
            .verify_account_password_by_id(account.id, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation("Current password is incorrect".to_string()));
        }

        self.store
            .update_account_password(account.id, new_password, &self.security)
            .await?;

        info!(user_id = %account.user_id, "Password changed");
        Ok(())
    }

    async fn deactivate(&self, caller: &AuthUser) -> Result<(), AuthError> {
        let account = self.active_account(caller).await?;

        if !self.store.deactivate_account(account.id).await? {
            return Err(AuthError::AccountInactiveOrMissing);
        }

        info!(user_id = %account.user_id, "Account deactivated");
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        self.request_password_reset_at(email, Utc::now()).await
    }

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        self.reset_password_at(email, code, new_password, Utc::now())
            .await
    }
}
