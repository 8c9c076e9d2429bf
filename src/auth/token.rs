/// Access and refresh token signing contexts
use crate::{
    config::AuthConfig,
    error::{ApiError, ApiResult},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Which signing context a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived, authorizes individual requests
    Access,
    /// Long-lived, stored on the user record as the session credential
    Refresh,
}

/// Token payload; carries the account id only
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens
///
/// The two kinds use independent secrets and lifetimes, so an access
/// token never validates in the refresh context and vice versa.
pub struct TokenIssuer {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_secret: config.access_token_secret.clone(),
            refresh_secret: config.refresh_token_secret.clone(),
            access_ttl: Duration::hours(config.access_token_ttl_hours),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days),
        }
    }

    fn context(&self, kind: TokenKind) -> (&str, Duration) {
        match kind {
            TokenKind::Access => (self.access_secret.as_str(), self.access_ttl),
            TokenKind::Refresh => (self.refresh_secret.as_str(), self.refresh_ttl),
        }
    }

    /// Sign a token for the given account id
    pub fn issue(&self, user_id: &str, kind: TokenKind) -> ApiResult<String> {
        let (secret, ttl) = self.context(kind);
        let now = Utc::now();

        let claims = Claims {
            id: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token and return the account id it was issued for
    ///
    /// Expiry and signature failures are distinguished so the caller can
    /// surface different messages.
    pub fn verify(&self, token: &str, kind: TokenKind) -> ApiResult<String> {
        let (secret, _) = self.context(kind);
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => Ok(data.claims.id),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(ApiError::TokenExpired),
                _ => Err(ApiError::TokenInvalid),
            },
        }
    }
}
