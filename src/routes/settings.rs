use crate::{
    auth::{AuthMiddleware, CurrentUser},
    error::AppError,
    models::{Settings, SettingsUpdate},
    security::Sanitized,
    state::AppState,
};
use actix_web::{dev::HttpServiceFactory, get, patch, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

pub fn scope() -> impl HttpServiceFactory {
    web::scope("/settings")
        .wrap(AuthMiddleware)
        .service(get_settings)
        .service(update_settings)
}

/// Stored preferences, or the defaults if the user never saved any.
#[get("")]
pub async fn get_settings(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl Responder, AppError> {
    let settings = state
        .settings
        .get(user.id)
        .await?
        .unwrap_or_else(|| Settings::defaults(user.id));

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": settings
    })))
}

#[patch("")]
pub async fn update_settings(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    body: Sanitized<SettingsUpdate>,
) -> Result<impl Responder, AppError> {
    let update = body.into_inner();
    update.validate()?;

    let mut settings = state
        .settings
        .get(user.id)
        .await?
        .unwrap_or_else(|| Settings::defaults(user.id));
    settings.apply(update);
    let settings = state.settings.upsert(settings).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": settings
    })))
}
