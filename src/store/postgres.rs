use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{SettingsStore, TaskStore, UserStore, DUPLICATE_EMAIL};
use crate::error::AppError;
use crate::models::{NewUser, ProfileChanges, Settings, Task, TaskQuery, User};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, password_changed_at, role, status, created_at";
const TASK_COLUMNS: &str =
    "id, title, description, priority, status, due_date, created_at, updated_at, user_id";

/// Maps a unique-constraint violation on `users.email` to a client error.
fn email_conflict(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return AppError::BadRequest(DUPLICATE_EMAIL.into());
        }
    }
    error.into()
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(email_conflict)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: i32,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET name = COALESCE($1, name), email = COALESCE($2, email), status = COALESCE($3, status) \
             WHERE id = $4 RETURNING {USER_COLUMNS}"
        ))
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(email_conflict)
    }

    async fn update_password(
        &self,
        id: i32,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET password_hash = $1, password_changed_at = $2 \
             WHERE id = $3 RETURNING {USER_COLUMNS}"
        ))
        .bind(password_hash)
        .bind(changed_at)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn list(&self, user_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        // Conditions are appended in the same order their values are bound below.
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1");
        let mut param = 2;

        if query.status.is_some() {
            sql.push_str(&format!(" AND status = ${}", param));
            param += 1;
        }
        if query.priority.is_some() {
            sql.push_str(&format!(" AND priority = ${}", param));
            param += 1;
        }
        let search = query.search.as_deref().filter(|s| !s.is_empty());
        if search.is_some() {
            sql.push_str(&format!(
                " AND (title ILIKE ${p} OR description ILIKE ${p})",
                p = param
            ));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(user_id);
        if let Some(status) = query.status {
            query_builder = query_builder.bind(status);
        }
        if let Some(priority) = query.priority {
            query_builder = query_builder.bind(priority);
        }
        if let Some(search) = search {
            query_builder = query_builder.bind(format!("%{}%", search));
        }

        Ok(query_builder.fetch_all(&self.pool).await?)
    }

    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, priority, status, due_date, created_at, updated_at, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority)
        .bind(task.status)
        .bind(task.due_date)
        .bind(task.created_at)
        .bind(task.updated_at)
        .bind(task.user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn get(&self, user_id: i32, id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks \
             SET title = $1, description = $2, priority = $3, status = $4, due_date = $5, updated_at = $6 \
             WHERE id = $7 AND user_id = $8 RETURNING {TASK_COLUMNS}"
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority)
        .bind(task.status)
        .bind(task.due_date)
        .bind(task.updated_at)
        .bind(task.id)
        .bind(task.user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete(&self, user_id: i32, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get(&self, user_id: i32) -> Result<Option<Settings>, AppError> {
        let settings = sqlx::query_as::<_, Settings>(
            "SELECT user_id, theme, language, email_notifications, updated_at \
             FROM settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(settings)
    }

    async fn upsert(&self, settings: Settings) -> Result<Settings, AppError> {
        let settings = sqlx::query_as::<_, Settings>(
            "INSERT INTO settings (user_id, theme, language, email_notifications, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE \
             SET theme = EXCLUDED.theme, language = EXCLUDED.language, \
                 email_notifications = EXCLUDED.email_notifications, updated_at = EXCLUDED.updated_at \
             RETURNING user_id, theme, language, email_notifications, updated_at",
        )
        .bind(settings.user_id)
        .bind(settings.theme)
        .bind(&settings.language)
        .bind(settings.email_notifications)
        .bind(settings.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(settings)
    }
}
