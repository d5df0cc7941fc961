//! Cross-cutting request hardening: response security headers, CORS, and the
//! `Sanitized` body extractor.

use actix_cors::Cors;
use actix_web::{
    dev::Payload, http::header, middleware::DefaultHeaders, web, Error as ActixError,
    FromRequest, HttpRequest,
};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{Config, Environment};
use crate::error::AppError;

const HSTS: &str = "max-age=15552000; includeSubDomains";

pub fn security_headers(environment: Environment) -> DefaultHeaders {
    let headers = DefaultHeaders::new()
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .add((header::X_FRAME_OPTIONS, "DENY"))
        .add((header::REFERRER_POLICY, "no-referrer"))
        .add((header::X_XSS_PROTECTION, "0"));

    if environment.is_production() {
        headers.add((header::STRICT_TRANSPORT_SECURITY, HSTS))
    } else {
        headers
    }
}

/// A single configured origin gets credentialed CORS; otherwise any origin, no credentials.
pub fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(3600);

    match config.cors_origin.as_deref() {
        Some(origin) => cors.allowed_origin(origin).supports_credentials(),
        None => cors.allow_any_origin(),
    }
}

/// Drops object keys starting with `$` and escapes angle brackets in strings, recursively.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(escape_html(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| !key.starts_with('$'))
                .map(|(key, value)| (key, sanitize_value(value)))
                .collect(),
        ),
        other => other,
    }
}

fn escape_html(input: &str) -> String {
    input.replace('<', "&lt;").replace('>', "&gt;")
}

/// JSON body extractor that runs the payload through `sanitize_value` before
/// deserializing it into `T`.
///
/// Size limits and content-type checks come from the app's `JsonConfig`.
#[derive(Debug)]
pub struct Sanitized<T>(pub T);

impl<T> Sanitized<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for Sanitized<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);

        Box::pin(async move {
            let web::Json(raw) = body.await?;
            serde_json::from_value(sanitize_value(raw))
                .map(Sanitized)
                .map_err(|e| {
                    ActixError::from(AppError::BadRequest(format!("Invalid request body: {}", e)))
                })
        })
    }
}
