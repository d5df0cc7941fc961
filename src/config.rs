//! Process-wide configuration, read once at startup.
//!
//! `Config` is immutable after construction and shared through `AppState`;
//! nothing else in the crate reads the environment.

use chrono::Duration;
use lazy_static::lazy_static;
use regex::Regex;
use std::env;
use std::fmt;

const DATABASE_PASSWORD_PLACEHOLDER: &str = "<PASSWORD>";

lazy_static! {
    // "90d", "12h", "30m", "45s" or a bare number of seconds
    static ref DURATION_REGEX: Regex = Regex::new(r"^(\d+)\s*([smhd]?)$").unwrap();
}

/// Deployment mode. Controls cookie hardening and HSTS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// A required variable is not set.
    Missing(&'static str),
    /// A variable is set but cannot be interpreted.
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub jwt_cookie_expires_in_days: i64,
    pub server_host: String,
    pub server_port: u16,
    pub environment: Environment,
    pub cors_origin: Option<String>,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let mut database_url = require("DATABASE_URL")?;
        if database_url.contains(DATABASE_PASSWORD_PLACEHOLDER) {
            let password = require("DATABASE_PASSWORD")?;
            database_url = database_url.replace(DATABASE_PASSWORD_PLACEHOLDER, &password);
        }

        let jwt_secret = require("JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                value: jwt_secret,
            });
        }

        let jwt_expires_in = match lookup("JWT_EXPIRES_IN") {
            Some(raw) => parse_duration(&raw).ok_or(ConfigError::Invalid {
                key: "JWT_EXPIRES_IN",
                value: raw,
            })?,
            None => Duration::days(90),
        };

        let environment = match lookup("APP_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "APP_ENV",
                    value: other.to_string(),
                })
            }
        };

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", 12u32)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            jwt_expires_in,
            jwt_cookie_expires_in_days: parse_or(&lookup, "JWT_COOKIE_EXPIRES_IN", 90)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 8080)?,
            environment,
            cors_origin: lookup("CORS_ORIGIN").filter(|origin| !origin.is_empty()),
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

/// Parses a lifetime such as `90d`, `12h`, `30m`, `45s` or `3600`.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let caps = DURATION_REGEX.captures(raw.trim())?;
    let amount: i64 = caps[1].parse().ok()?;
    match &caps[2] {
        "d" => Some(Duration::days(amount)),
        "h" => Some(Duration::hours(amount)),
        "m" => Some(Duration::minutes(amount)),
        _ => Some(Duration::seconds(amount)),
    }
}
