//! Domain service for the credential lifecycle.
//!
//! Handles signup, login, token refresh, password changes, account
//! deactivation and the forgot/reset password flow.

use serde::Serialize;
use thiserror::Error;

use crate::models::account::Account;
use crate::services::token::{AuthUser, TokenError};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    DuplicateIdentity,

    #[error("User not found or inactive")]
    AccountInactiveOrMissing,

    #[error("Invalid or expired reset code")]
    InvalidOrExpiredCode,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Registration fields as submitted by the client.
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Account plus a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: Account,
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a new account and issues its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateIdentity`] if the email is already registered.
    async fn signup(&self, input: SignupInput) -> Result<LoginResult, AuthError>;

    /// Verifies credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown email, a wrong
    /// password or an inactive account alike.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Issues a new token from the caller's current account state.
    async fn refresh_token(&self, caller: &AuthUser) -> Result<LoginResult, AuthError>;

    /// Gets the caller's account.
    async fn current_account(&self, caller: &AuthUser) -> Result<Account, AuthError>;

    /// Changes the caller's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is incorrect
    /// or the new one is invalid.
    async fn change_password(
        &self,
        caller: &AuthUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Marks the caller's account inactive and deleted.
    async fn deactivate(&self, caller: &AuthUser) -> Result<(), AuthError>;

    /// Generates and delivers a reset code. Succeeds whether or not the
    /// email is registered.
    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// Replaces the password when `code` matches the stored, unexpired code.
    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
