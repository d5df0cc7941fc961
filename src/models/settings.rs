use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

lazy_static! {
    // "en", "de", "pt-BR"
    static ref LANGUAGE_REGEX: Regex = Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").unwrap();
}

/// Corresponds to the `ui_theme` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "ui_theme", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Per-user preferences. A user without a stored row sees `Settings::defaults`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub user_id: i32,
    pub theme: Theme,
    pub language: String,
    pub email_notifications: bool,
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    pub fn defaults(user_id: i32) -> Self {
        Self {
            user_id,
            theme: Theme::default(),
            language: "en".to_string(),
            email_notifications: true,
            updated_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(email_notifications) = update.email_notifications {
            self.email_notifications = email_notifications;
        }
        self.updated_at = Utc::now();
    }
}

/// Allow-listed settings fields; unknown keys are dropped.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub theme: Option<Theme>,
    #[validate(regex(path = "LANGUAGE_REGEX", message = "Language must look like 'en' or 'pt-BR'"))]
    pub language: Option<String>,
    pub email_notifications: Option<bool>,
}
