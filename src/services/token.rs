//! Stateless bearer tokens.
//!
//! Tokens are HMAC-signed JWTs carrying the account's numeric id, email and
//! role. Nothing is persisted, so a token stays valid until it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AuthConfig, MAX_TOKEN_TTL_HOURS};
use crate::models::account::Account;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,

    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Token lifetime is out of range")]
    InvalidLifetime,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Claim set embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub sub: String,
}

/// Authenticated caller, handed to handlers after the token was validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    issuer: String,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, ttl: Duration, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();

        // Any HMAC variant is accepted; every other algorithm (and `none`) is rejected.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
            issuer,
        }
    }

    /// Build from the `[auth]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::MissingSecret`] when no non-blank secret is configured
    /// and [`TokenError::InvalidLifetime`] when the lifetime is not positive or
    /// exceeds [`MAX_TOKEN_TTL_HOURS`].
    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        let secret = config
            .jwt_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(TokenError::MissingSecret)?;

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&config.token_ttl_hours) {
            return Err(TokenError::InvalidLifetime);
        }

        let ttl = Duration::try_hours(config.token_ttl_hours).ok_or(TokenError::InvalidLifetime)?;

        Ok(Self::new(secret, ttl, config.issuer.clone()))
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a token for `account`, valid from now for the configured lifetime.
    pub fn issue(&self, account: &Account) -> Result<String, TokenError> {
        self.issue_at(account, Utc::now())
    }

    /// Mint a token whose validity window starts at `now`.
    pub fn issue_at(&self, account: &Account, now: DateTime<Utc>) -> Result<String, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::InvalidLifetime)?;

        let claims = Claims {
            user_id: account.id,
            email: account.email.clone(),
            role: account.role.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            sub: account.id.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm family, issuer and validity window.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const SECRET: &str = "unit-test-secret";

    fn service() -> TokenService {
        TokenService::new(SECRET, Duration::hours(24), "farm4u")
    }

    fn account() -> Account {
        Account {
            id: 42,
            user_id: "7d0f3a36-6a43-4f4e-9d0b-2f3c1f0f9c11".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Field".to_string(),
            email: "ada@example.com".to_string(),
            role: "Farmer".to_string(),
            phone_number: String::new(),
            address: String::new(),
            active: true,
            created_at: Utc::now().to_rfc3339(),
            updated_at: Utc::now().to_rfc3339(),
        }
    }

    fn claims_for(account: &Account, now: DateTime<Utc>) -> Claims {
        Claims {
            user_id: account.id,
            email: account.email.clone(),
            role: account.role.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            iss: "farm4u".to_string(),
            sub: account.id.to_string(),
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let service = service();
        let account = account();

        let token = service.issue(&account).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, "Farmer");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "farm4u");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.nbf, claims.iat);

        let caller = AuthUser::from(claims);
        assert_eq!(caller.id, 42);
    }

    #[test]
    fn test_token_has_three_parts() {
        let token = service().issue(&account()).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_rejects_other_secret() {
        let token = TokenService::new("another-secret", Duration::hours(24), "farm4u")
            .issue(&account())
            .unwrap();

        assert!(matches!(service().validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_accepts_other_hmac_variant() {
        let claims = claims_for(&account(), Utc::now());
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(service().validate(&token).unwrap(), claims);
    }

    #[test]
    fn test_rejects_non_hmac_algorithm_header() {
        // Header claims RS256 but the signature is a valid HMAC over the
        // same bytes: the algorithm substitution must still be refused.
        let claims = claims_for(&account(), Utc::now());
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let message = format!("{header}.{payload}");
        let signature = jsonwebtoken::crypto::sign(
            message.as_bytes(),
            &EncodingKey::from_secret(SECRET.as_bytes()),
            Algorithm::HS256,
        )
        .unwrap();

        let token = format!("{message}.{signature}");
        assert!(matches!(service().validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_rejects_unsigned_token() {
        let claims = claims_for(&account(), Utc::now());
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());

        let token = format!("{header}.{payload}.");
        assert!(matches!(service().validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_rejects_expired_token() {
        let service = service();
        let issued = Utc::now() - Duration::hours(25);
        let token = service.issue_at(&account(), issued).unwrap();

        assert!(matches!(service.validate(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_rejects_token_before_not_before() {
        let service = service();
        let issued = Utc::now() + Duration::hours(1);
        let token = service.issue_at(&account(), issued).unwrap();

        assert!(matches!(service.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_rejects_foreign_issuer() {
        let token = TokenService::new(SECRET, Duration::hours(24), "someone-else")
            .issue(&account())
            .unwrap();

        assert!(matches!(service().validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_rejects_malformed_token() {
        let service = service();
        assert!(matches!(service.validate(""), Err(TokenError::Invalid)));
        assert!(matches!(service.validate("not-a-token"), Err(TokenError::Invalid)));
        assert!(matches!(service.validate("a.b.c"), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_from_config_requires_secret() {
        let mut config = AuthConfig::default();
        assert!(matches!(
            TokenService::from_config(&config),
            Err(TokenError::MissingSecret)
        ));

        config.jwt_secret = Some("configured".to_string());
        config.token_ttl_hours = 2;
        let service = TokenService::from_config(&config).unwrap();
        assert_eq!(service.ttl(), Duration::hours(2));
    }

    #[test]
    fn test_from_config_rejects_out_of_range_lifetime() {
        let mut config = AuthConfig {
            jwt_secret: Some("configured".to_string()),
            ..AuthConfig::default()
        };

        for hours in [0, -1, MAX_TOKEN_TTL_HOURS + 1, i64::MAX] {
            config.token_ttl_hours = hours;
            assert!(
                matches!(
                    TokenService::from_config(&config),
                    Err(TokenError::InvalidLifetime)
                ),
                "{hours} hours"
            );
        }
    }

    #[test]
    fn test_issue_reports_unrepresentable_expiry() {
        let service = TokenService::new(SECRET, Duration::days(365 * 100_000_000), "farm4u");

        assert!(matches!(
            service.issue(&account()),
            Err(TokenError::InvalidLifetime)
        ));
    }
}
