use actix_web::cookie::{
    time::{Duration, OffsetDateTime},
    Cookie, SameSite,
};

use crate::config::{Config, Environment};

pub const COOKIE_NAME: &str = "jwt";
/// Value written over the session cookie on log-out.
pub const LOGGED_OUT: &str = "loggedout";
const LOGGED_OUT_SECONDS: i64 = 10;

/// The `jwt` cookie carrying a freshly issued token.
pub fn session_cookie(token: &str, config: &Config) -> Cookie<'static> {
    build(
        token.to_string(),
        Duration::days(config.jwt_cookie_expires_in_days),
        config.environment,
    )
}

/// Replaces the session cookie with a sentinel that expires almost immediately.
pub fn logout_cookie(environment: Environment) -> Cookie<'static> {
    build(
        LOGGED_OUT.to_string(),
        Duration::seconds(LOGGED_OUT_SECONDS),
        environment,
    )
}

fn build(value: String, lifetime: Duration, environment: Environment) -> Cookie<'static> {
    let production = environment.is_production();
    Cookie::build(COOKIE_NAME, value)
        .path("/")
        .http_only(true)
        .max_age(lifetime)
        .expires(OffsetDateTime::now_utc() + lifetime)
        .secure(production)
        .same_site(if production {
            SameSite::Strict
        } else {
            SameSite::Lax
        })
        .finish()
}
