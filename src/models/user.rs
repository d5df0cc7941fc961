use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Role of an account. Corresponds to the `user_role` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

/// A user account as stored in the database.
///
/// `password_hash` is never serialized, so a `User` can be returned from any
/// handler as-is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub role: UserRole,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns true if the password was changed at or after `issued_at_ms`
    /// (milliseconds since epoch). A token from the same millisecond as the
    /// change counts as older.
    pub fn changed_password_after(&self, issued_at_ms: i64) -> bool {
        match self.password_changed_at {
            Some(changed_at) => issued_at_ms <= changed_at.timestamp_millis(),
            None => false,
        }
    }

    /// Instant to record for a new password change. Never earlier than the
    /// token issued after the previous change, so that token is revoked too.
    pub fn next_password_change(&self) -> DateTime<Utc> {
        let now = password_changed_now();
        match self.password_changed_at {
            Some(previous) => now.max(previous + Duration::milliseconds(1)),
            None => now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Timestamp recorded when a password is replaced, truncated to whole
/// milliseconds so it survives a database round trip unchanged.
///
/// The replacement token must be issued strictly after this instant.
pub fn password_changed_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Sign-up payload.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 50, message = "Please tell us your name"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords are not the same"))]
    pub password_confirm: String,
}

/// Log-in payload. Missing fields deserialize as empty and are rejected by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub password_current: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords are not the same"))]
    pub password_confirm: String,
}

/// The only fields a user may change on their own profile.
///
/// Anything else in the request body (`role`, `id`, `password`, ...) is
/// dropped during deserialization.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub status: Option<String>,
}

impl ProfileUpdate {
    pub fn changes(self) -> ProfileChanges {
        ProfileChanges {
            name: self.name,
            email: self.email.map(|email| normalize_email(&email)),
            status: self.status,
        }
    }
}

/// The allow-listed profile fields after validation, ready for a store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.status.is_none()
    }
}

/// Everything needed to insert a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
