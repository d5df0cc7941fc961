//! Persistence seams.
//!
//! Handlers talk to these traits only. `postgres` backs them with `sqlx`; `memory`
//! keeps everything in process and is what the test-suite runs against.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, ProfileChanges, Settings, Task, TaskQuery, User};

pub use memory::{MemorySettingsStore, MemoryTaskStore, MemoryUserStore};
pub use postgres::{PgSettingsStore, PgTaskStore, PgUserStore};

pub(crate) const DUPLICATE_EMAIL: &str = "Email already registered";

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `BadRequest` when the email is already taken.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;
    /// Returns the record including its password hash.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn update_profile(
        &self,
        id: i32,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, AppError>;
    async fn update_password(
        &self,
        id: i32,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> Result<Option<User>, AppError>;
    /// Returns false when no such user existed.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

/// All task operations are scoped by owner; a task owned by someone else is
/// indistinguishable from a missing one.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self, user_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError>;
    async fn insert(&self, task: Task) -> Result<Task, AppError>;
    async fn get(&self, user_id: i32, id: Uuid) -> Result<Option<Task>, AppError>;
    async fn update(&self, task: Task) -> Result<Option<Task>, AppError>;
    async fn delete(&self, user_id: i32, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, user_id: i32) -> Result<Option<Settings>, AppError>;
    async fn upsert(&self, settings: Settings) -> Result<Settings, AppError>;
}
