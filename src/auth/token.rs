use crate::config::Config;
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

pub const EXPIRED_TOKEN: &str = "Your token has expired! Please log in again.";
pub const INVALID_TOKEN: &str = "Invalid token. Please log in again!";

/// Represents the claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The user's unique identifier.
    pub sub: i32,
    /// Issue time, seconds since epoch.
    pub iat: i64,
    /// Issue time, milliseconds since epoch. Compared against password changes.
    pub iat_ms: i64,
    /// Expiration time, seconds since epoch.
    pub exp: i64,
}

/// Signing and verification keys plus the token lifetime.
///
/// Built once from `Config`; signing is a pure function of the secret, the
/// user id, and the issue time.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expires_in: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, expires_in: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expires_in)
    }

    /// Signs a token for `user_id` issued now.
    pub fn sign(&self, user_id: i32) -> Result<String, AppError> {
        self.sign_at(user_id, Utc::now())
    }

    /// Signs a token for `user_id` as if issued at `issued_at`.
    pub fn sign_at(&self, user_id: i32, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            iat: issued_at.timestamp(),
            iat_ms: issued_at.timestamp_millis(),
            exp: (issued_at + self.expires_in).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature and expiry and returns the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::Unauthorized(EXPIRED_TOKEN.into()),
                _ => {
                    log::debug!("token rejected: {}", e);
                    AppError::Unauthorized(INVALID_TOKEN.into())
                }
            })
    }
}
