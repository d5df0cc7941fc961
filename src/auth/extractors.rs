use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use super::middleware::NOT_LOGGED_IN;
use crate::error::AppError;
use crate::models::User;

/// The user resolved by `AuthMiddleware` for this request.
///
/// Only usable on routes behind `AuthMiddleware`; anywhere else the user is
/// missing from the extensions and extraction fails with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(CurrentUser(user))),
            None => {
                let err = AppError::Unauthorized(NOT_LOGGED_IN.to_string());
                ready(Err(err.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;

    #[actix_rt::test]
    async fn test_current_user_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(User {
            id: 123,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: String::new(),
            password_changed_at: None,
            role: UserRole::User,
            status: None,
            created_at: Utc::now(),
        });

        let mut payload = Payload::None;
        let extracted = CurrentUser::from_request(&req, &mut payload).await;
        assert_eq!(extracted.unwrap().0.id, 123);
    }

    #[actix_rt::test]
    async fn test_current_user_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let err = CurrentUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }
}
