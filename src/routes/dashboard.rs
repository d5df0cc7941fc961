use crate::{
    auth::{AuthMiddleware, CurrentUser},
    error::AppError,
    models::{DashboardSummary, TaskQuery},
    state::AppState,
};
use actix_web::{dev::HttpServiceFactory, get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

pub fn scope() -> impl HttpServiceFactory {
    web::scope("/dashboard")
        .wrap(AuthMiddleware)
        .service(summary)
}

/// Task counts, deadline pressure and the most recent tasks for the caller.
#[get("")]
pub async fn summary(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list(user.id, &TaskQuery::default()).await?;
    let summary = DashboardSummary::from_tasks(tasks, Utc::now());

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": summary
    })))
}
