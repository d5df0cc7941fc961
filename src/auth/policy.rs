//! Decides whether a correctly signed, unexpired token is still acceptable for
//! the user it names.
//!
//! Tokens are not stored server-side. The default policy rejects any token
//! issued before the user's most recent password change. A revocation list
//! can replace it by implementing `SessionPolicy`; the auth gate does not change.

use async_trait::async_trait;

use super::token::Claims;
use crate::error::AppError;
use crate::models::User;

pub const PASSWORD_CHANGED: &str = "User recently changed password! Please log in again.";

#[async_trait]
pub trait SessionPolicy: Send + Sync {
    async fn validate(&self, claims: &Claims, user: &User) -> Result<(), AppError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordChangePolicy;

#[async_trait]
impl SessionPolicy for PasswordChangePolicy {
    async fn validate(&self, claims: &Claims, user: &User) -> Result<(), AppError> {
        if user.changed_password_after(claims.iat_ms) {
            log::warn!("user {} presented a token older than their password", user.id);
            return Err(AppError::Unauthorized(PASSWORD_CHANGED.into()));
        }
        Ok(())
    }
}
