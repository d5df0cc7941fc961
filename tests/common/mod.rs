#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    http::header,
    middleware::Logger,
    test, web, App, Error,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use taskboard::{
    auth::{hash_password, COOKIE_NAME},
    models::{NewUser, User, UserRole},
    routes,
    security::{cors, security_headers},
    AppState, Config,
};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Password123!";

/// Config as the binary would read it, minus the database; extra pairs override the defaults.
pub fn config_with(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = [
        ("DATABASE_URL", "postgres://unused@localhost/unused"),
        ("JWT_SECRET", TEST_SECRET),
        ("BCRYPT_COST", "4"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config should be valid")
}

pub fn memory_state() -> AppState {
    AppState::in_memory(config_with(&[]))
}

/// The same middleware stack and routes as `main`, over whatever stores `state` carries.
pub async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    let environment = state.config.environment;
    let cors = cors(&state.config);

    test::init_service(
        App::new()
            .wrap(cors)
            .wrap(security_headers(environment))
            .wrap(Logger::default())
            .app_data(web::Data::new(state))
            .configure(routes::config),
    )
    .await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub struct TestUser {
    pub id: i32,
    pub token: String,
}

pub async fn signup<S, B>(app: &S, name: &str, email: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/users/signup")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "passwordConfirm": PASSWORD
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        201,
        "Sign-up failed. Body: {}",
        String::from_utf8_lossy(&body)
    );

    let json: Value = serde_json::from_slice(&body).expect("sign-up body should be JSON");
    TestUser {
        id: json["user"]["id"].as_i64().expect("user id") as i32,
        token: json["token"].as_str().expect("token").to_string(),
    }
}

/// Inserts an admin directly through the store; there is no API for granting the role.
pub async fn create_admin(state: &AppState, email: &str) -> User {
    state
        .users
        .create(NewUser {
            name: "Admin".into(),
            email: email.into(),
            password_hash: hash_password(PASSWORD, 4).unwrap(),
            role: UserRole::Admin,
        })
        .await
        .unwrap()
}

pub fn session_cookie_of<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == COOKIE_NAME)
        .map(|cookie| cookie.into_owned())
}

/// Calls the service and returns the status together with the JSON body.
pub async fn call_json<S, B>(app: &S, req: Request) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!("expected JSON, got: {}", String::from_utf8_lossy(&body))
        })
    };
    (status, json)
}
