pub mod dashboard;
pub mod health;
pub mod settings;
pub mod tasks;
pub mod users;

use actix_web::{error, web, HttpResponse};
use serde_json::json;

use crate::error::AppError;

/// Largest accepted JSON body.
pub const JSON_LIMIT: usize = 10 * 1024;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .service(health::health)
        .service(
            web::scope("/api")
                .service(users::scope())
                .service(tasks::scope())
                .service(dashboard::scope())
                .service(settings::scope()),
        )
        .default_service(web::to(not_found));
}

/// Body for any route nothing else matched.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": "Not Found" }))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            let message = match &err {
                error::JsonPayloadError::OverflowKnownLength { .. }
                | error::JsonPayloadError::Overflow { .. } => {
                    format!("Request body exceeds {} bytes", JSON_LIMIT)
                }
                _ => format!("Invalid request body: {}", err),
            };
            AppError::BadRequest(message).into()
        })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid path: {}", err)).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    })
}
