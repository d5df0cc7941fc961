use crate::{
    auth::{AuthMiddleware, CurrentUser},
    error::AppError,
    models::{Task, TaskInput, TaskQuery},
    security::Sanitized,
    state::AppState,
};
use actix_web::{delete, dev::HttpServiceFactory, get, post, put, web, HttpResponse, Responder};
use log::info;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

const TASK_NOT_FOUND: &str = "Task not found";

pub fn scope() -> impl HttpServiceFactory {
    web::scope("/tasks")
        .wrap(AuthMiddleware)
        .service(get_tasks)
        .service(create_task)
        .service(get_task)
        .service(update_task)
        .service(delete_task)
}

/// Retrieves the authenticated user's tasks, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): e.g. "todo", "in_progress", "review", "done".
/// - `priority` (optional): "low", "medium", "high" or "urgent".
/// - `search` (optional): case-insensitive match on title or description.
///
/// ## Responses:
/// - `200 OK`: `{ status, results, data: [Task] }`.
/// - `400 Bad Request`: an unknown status or priority value.
/// - `401 Unauthorized`: no valid session.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list(user.id, &query).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "results": tasks.len(),
        "data": tasks
    })))
}

/// Creates a task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: `{ status, data: Task }`.
/// - `400 Bad Request`: malformed body or failed validation (title 1-200
///   characters, description up to 1000).
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    body: Sanitized<TaskInput>,
) -> Result<impl Responder, AppError> {
    let input = body.into_inner();
    input.validate()?;

    let task = state.tasks.insert(Task::new(input, user.id)).await?;
    info!("user {} created task {}", user.id, task.id);

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "data": task
    })))
}

/// Retrieves one task. Tasks owned by someone else are reported as missing.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .get(user.id, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": task
    })))
}

/// Replaces the caller-controlled fields of a task the user owns.
///
/// ## Responses:
/// - `200 OK`: `{ status, data: Task }`.
/// - `400 Bad Request`: failed validation.
/// - `404 Not Found`: missing or not owned by the caller.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    task_id: web::Path<Uuid>,
    body: Sanitized<TaskInput>,
) -> Result<impl Responder, AppError> {
    let input = body.into_inner();
    input.validate()?;

    let mut task = state
        .tasks
        .get(user.id, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;
    task.apply(input);

    let task = state
        .tasks
        .update(task)
        .await?
        .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": task
    })))
}

#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let id = task_id.into_inner();
    if !state.tasks.delete(user.id, id).await? {
        return Err(AppError::NotFound(TASK_NOT_FOUND.into()));
    }

    info!("user {} deleted task {}", user.id, id);
    Ok(HttpResponse::NoContent().finish())
}
