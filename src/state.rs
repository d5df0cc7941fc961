use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::policy::{PasswordChangePolicy, SessionPolicy};
use crate::auth::token::TokenKeys;
use crate::config::Config;
use crate::store::{
    MemorySettingsStore, MemoryTaskStore, MemoryUserStore, PgSettingsStore, PgTaskStore,
    PgUserStore, SettingsStore, TaskStore, UserStore,
};

/// Shared, read-only application state handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenKeys,
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub sessions: Arc<dyn SessionPolicy>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            tokens: TokenKeys::from_config(&config),
            config: Arc::new(config),
            users,
            tasks,
            settings,
            sessions: Arc::new(PasswordChangePolicy),
        }
    }

    pub fn postgres(config: Config, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgTaskStore::new(pool.clone())),
            Arc::new(PgSettingsStore::new(pool)),
        )
    }

    pub fn in_memory(config: Config) -> Self {
        Self::new(
            config,
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryTaskStore::new()),
            Arc::new(MemorySettingsStore::new()),
        )
    }

    pub fn with_session_policy(mut self, policy: Arc<dyn SessionPolicy>) -> Self {
        self.sessions = policy;
        self
    }
}
