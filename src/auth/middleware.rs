use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, HttpRequest,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use super::cookie::{COOKIE_NAME, LOGGED_OUT};
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

pub const NOT_LOGGED_IN: &str = "You are not logged in! Please log in to get access.";
pub const USER_GONE: &str = "The user belonging to this token no longer exists.";

/// Finds the session token: `Authorization: Bearer <token>` first, then the `jwt` cookie.
/// The log-out sentinel counts as no token.
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    bearer.or_else(|| {
        req.cookie(COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty() && token != LOGGED_OUT)
    })
}

/// Runs a token through verification, user lookup, and the session policy.
pub async fn authenticate(state: &AppState, token: Option<&str>) -> Result<User, AppError> {
    let token = token.ok_or_else(|| AppError::Unauthorized(NOT_LOGGED_IN.into()))?;
    let claims = state.tokens.verify(token)?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            log::warn!("token for deleted user {}", claims.sub);
            AppError::Unauthorized(USER_GONE.into())
        })?;

    state.sessions.validate(&claims, &user).await?;
    Ok(user)
}

/// Gate for protected scopes and resources. On success the resolved `User` is placed in the
/// request extensions for `CurrentUser`.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;

            let token = token_from_request(req.request());
            let user = authenticate(&state, token.as_deref()).await?;
            log::debug!("authenticated user {} for {}", user.id, req.path());

            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}
