use actix_web::{get, HttpResponse};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

/// Liveness probe. Needs no session and never touches the database.
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
