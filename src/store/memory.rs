use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SettingsStore, TaskStore, UserStore, DUPLICATE_EMAIL};
use crate::error::AppError;
use crate::models::{NewUser, ProfileChanges, Settings, Task, TaskQuery, User};

#[derive(Default)]
struct UserTable {
    next_id: i32,
    rows: HashMap<i32, User>,
}

/// In-process user table with the same uniqueness rule as the SQL schema.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<UserTable>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut table = self.inner.write().await;
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
        }
        table.next_id += 1;
        let created = User {
            id: table.next_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            password_changed_at: None,
            role: user.role,
            status: None,
            created_at: Utc::now(),
        };
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let table = self.inner.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn update_profile(
        &self,
        id: i32,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, AppError> {
        let mut table = self.inner.write().await;
        if let Some(email) = &changes.email {
            if table.rows.values().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
            }
        }
        let Some(user) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(status) = &changes.status {
            user.status = Some(status.clone());
        }
        Ok(Some(user.clone()))
    }

    async fn update_password(
        &self,
        id: i32,
        password_hash: &str,
        changed_at: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        let mut table = self.inner.write().await;
        Ok(table.rows.get_mut(&id).map(|user| {
            user.password_hash = password_hash.to_string();
            user.password_changed_at = Some(changed_at);
            user.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    rows: RwLock<HashMap<Uuid, Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list(&self, user_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let rows = self.rows.read().await;
        let mut tasks: Vec<Task> = rows
            .values()
            .filter(|t| t.user_id == user_id && query.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn insert(&self, task: Task) -> Result<Task, AppError> {
        self.rows.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get(&self, user_id: i32, id: Uuid) -> Result<Option<Task>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.get(&id).filter(|t| t.user_id == user_id).cloned())
    }

    async fn update(&self, task: Task) -> Result<Option<Task>, AppError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&task.id) {
            Some(existing) if existing.user_id == task.user_id => {
                *existing = task.clone();
                Ok(Some(task))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, user_id: i32, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.write().await;
        if rows.get(&id).is_some_and(|t| t.user_id == user_id) {
            rows.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }
}

#[derive(Default)]
pub struct MemorySettingsStore {
    rows: RwLock<HashMap<i32, Settings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, user_id: i32) -> Result<Option<Settings>, AppError> {
        Ok(self.rows.read().await.get(&user_id).cloned())
    }

    async fn upsert(&self, settings: Settings) -> Result<Settings, AppError> {
        self.rows
            .write()
            .await
            .insert(settings.user_id, settings.clone());
        Ok(settings)
    }
}
