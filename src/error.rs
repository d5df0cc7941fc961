//!
//! # Error Handling
//!
//! This module defines `AppError`, the single error type returned by handlers, stores,
//! and the authentication gate. Every variant maps to one HTTP status and renders as
//! a JSON body of the form `{"status": "fail" | "error", "message": "..."}`:
//! `fail` for client errors (4xx), `error` for server errors (5xx).
//!
//! Server-side failures are logged with their full detail and answered with a generic
//! message so that driver or library internals never reach the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all request-scoped errors the application can produce.
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid, expired, or superseded credentials (HTTP 401).
    Unauthorized(String),
    /// Malformed request or a rule violated by the submitted values (HTTP 400).
    BadRequest(String),
    /// Authenticated, but not allowed to act on the target (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist or is not visible to the caller (HTTP 404).
    NotFound(String),
    /// Field-level validation failure from the `validator` crate (HTTP 400).
    ValidationError(String),
    /// Error originating from `sqlx` (HTTP 500).
    DatabaseError(String),
    /// Anything else that went wrong on our side (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl AppError {
    /// The message shown to the client.
    fn public_message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                "Something went wrong. Please try again later."
            }
        }
    }
}

/// Converts `AppError` variants into JSON `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        let kind = if status.is_server_error() { "error" } else { "fail" };
        HttpResponse::build(status).json(json!({
            "status": kind,
            "message": self.public_message(),
        }))
    }
}

/// `RowNotFound` becomes a 404; every other driver failure is a 500.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// The library's reason is logged, not shown.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token error: {}", error);
        AppError::Unauthorized(crate::auth::token::INVALID_TOKEN.into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
