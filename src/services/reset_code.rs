//! Delivery of password reset codes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

/// Channel a freshly generated reset code is handed to.
#[async_trait]
pub trait ResetCodeSender: Send + Sync {
    async fn send(&self, email: &str, code: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()>;
}

/// Writes the code to the application log. Used until a real mail
/// channel is configured.
pub struct LogResetCodeSender;

#[async_trait]
impl ResetCodeSender for LogResetCodeSender {
    async fn send(&self, email: &str, code: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        info!(
            email = %email,
            code = %code,
            expires_at = %expires_at.to_rfc3339(),
            "Password reset code issued"
        );
        Ok(())
    }
}

/// Random six digit code in `100000..=999999`.
#[must_use]
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..1_000_000).to_string()
}
