use crate::{
    auth::{
        hash_password_blocking, logout_cookie, session_cookie, verify_password_blocking,
        AuthMiddleware, AuthResponse, CurrentUser,
    },
    error::AppError,
    models::{
        user::normalize_email,
        LoginRequest, NewUser, ProfileUpdate, SignupRequest, UpdatePasswordRequest, User,
        UserRole,
    },
    security::Sanitized,
    state::AppState,
};
use actix_web::{
    delete, dev::HttpServiceFactory, get, http::StatusCode, patch, post, web, HttpResponse,
    Responder,
};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde_json::json;
use validator::Validate;

const MISSING_CREDENTIALS: &str = "Please provide email and password!";
const INVALID_CREDENTIALS: &str = "Invalid email or password";
const WRONG_CURRENT_PASSWORD: &str = "Your current password is wrong.";
const NO_PERMISSION: &str = "You do not have permission to perform this action";

/// Protected handlers wrap `AuthMiddleware` on their own resource, so a path
/// that matches nothing here still falls through to the 404 handler.
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/users")
        .service(signup)
        .service(login)
        .service(logout)
        .service(get_me)
        .service(update_me)
        .service(update_password)
        .service(delete_user)
}

/// Signs a token for `user` issued at `issued_at` and returns it both in the
/// body and as the `jwt` cookie.
fn send_token(
    state: &AppState,
    user: User,
    status: StatusCode,
    issued_at: DateTime<Utc>,
) -> Result<HttpResponse, AppError> {
    let token = state.tokens.sign_at(user.id, issued_at)?;
    let cookie = session_cookie(&token, &state.config);

    Ok(HttpResponse::build(status)
        .cookie(cookie)
        .json(AuthResponse::success(token, user)))
}

/// Register a new account
///
/// New accounts always get the `user` role; a `role` in the body is ignored.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    body: Sanitized<SignupRequest>,
) -> Result<impl Responder, AppError> {
    let request = body.into_inner();
    request.validate()?;

    let password_hash =
        hash_password_blocking(request.password, state.config.bcrypt_cost).await?;

    let user = state
        .users
        .create(NewUser {
            name: request.name.trim().to_string(),
            email: normalize_email(&request.email),
            password_hash,
            role: UserRole::User,
        })
        .await?;

    info!("user {} signed up", user.id);
    send_token(&state, user, StatusCode::CREATED, Utc::now())
}

/// Log in with email and password
///
/// Unknown email and wrong password produce the same 401.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: Sanitized<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let LoginRequest { email, password } = body.into_inner();
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Unauthorized(MISSING_CREDENTIALS.into()));
    }

    let Some(user) = state.users.find_by_email(&normalize_email(&email)).await? else {
        warn!("failed login attempt");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!("failed login attempt for user {}", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    info!("user {} logged in", user.id);
    send_token(&state, user, StatusCode::OK, Utc::now())
}

/// Overwrite the session cookie with a short-lived sentinel.
#[get("/logout")]
pub async fn logout(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .cookie(logout_cookie(state.config.environment))
        .json(json!({ "status": "success" }))
}

#[get("/me", wrap = "AuthMiddleware")]
pub async fn get_me(CurrentUser(user): CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "success",
        "user": user
    }))
}

/// Update the caller's own profile
///
/// Only `name`, `email` and `status` can change here; every other field,
/// passwords included, is dropped.
#[patch("/me", wrap = "AuthMiddleware")]
pub async fn update_me(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    body: Sanitized<ProfileUpdate>,
) -> Result<impl Responder, AppError> {
    let update = body.into_inner();
    update.validate()?;

    let changes = update.changes();
    let user = if changes.is_empty() {
        user
    } else {
        state
            .users
            .update_profile(user.id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?
    };

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "user": user
    })))
}

/// Change the caller's password
///
/// Requires the current password. Tokens issued before the change stop
/// working; the response carries a new one.
#[patch("/me/password", wrap = "AuthMiddleware")]
pub async fn update_password(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    body: Sanitized<UpdatePasswordRequest>,
) -> Result<impl Responder, AppError> {
    let request = body.into_inner();

    if !verify_password_blocking(request.password_current.clone(), user.password_hash.clone())
        .await?
    {
        warn!("user {} gave a wrong current password", user.id);
        return Err(AppError::BadRequest(WRONG_CURRENT_PASSWORD.into()));
    }
    request.validate()?;

    let password_hash =
        hash_password_blocking(request.password, state.config.bcrypt_cost).await?;
    let changed_at = user.next_password_change();
    let user = state
        .users
        .update_password(user.id, &password_hash, changed_at)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!("user {} changed their password", user.id);
    send_token(
        &state,
        user,
        StatusCode::OK,
        changed_at + Duration::milliseconds(1),
    )
}

/// Delete an account
///
/// Allowed for the account holder and for admins. Deleting your own account
/// also clears the session cookie.
#[delete("/{id}", wrap = "AuthMiddleware")]
pub async fn delete_user(
    state: web::Data<AppState>,
    CurrentUser(caller): CurrentUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    let is_self = caller.id == id;

    if !is_self && !caller.is_admin() {
        warn!("user {} tried to delete user {}", caller.id, id);
        return Err(AppError::Forbidden(NO_PERMISSION.into()));
    }

    if !state.users.delete(id).await? {
        return Err(AppError::NotFound("No user found with that ID".into()));
    }

    info!("user {} deleted by {}", id, caller.id);
    let mut response = HttpResponse::NoContent();
    if is_self {
        response.cookie(logout_cookie(state.config.environment));
    }
    Ok(response.finish())
}
