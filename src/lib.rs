#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Account sign-up and log-in, token sessions with revocation on password change,"]
#![doc = "owner-scoped tasks, a dashboard summary and per-user settings, served over actix-web."]
#![doc = "The binary (`main.rs`) wires these modules to Postgres; the integration tests wire"]
#![doc = "them to the in-memory stores."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod security;
pub mod state;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
