//! Session authentication: token signing, the request gate, and the cookie
//! that carries the token to browsers.

pub mod cookie;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::models::User;

pub use cookie::{logout_cookie, session_cookie, COOKIE_NAME};
pub use extractors::CurrentUser;
pub use middleware::{authenticate, token_from_request, AuthMiddleware};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
};
pub use policy::{PasswordChangePolicy, SessionPolicy};
pub use token::{Claims, TokenKeys};

/// Body returned whenever a token is issued (sign-up, log-in, password update).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: String,
    /// The signed session token; also set as the `jwt` cookie.
    pub token: String,
    pub user: User,
}

impl AuthResponse {
    pub fn success(token: String, user: User) -> Self {
        Self {
            status: "success".to_string(),
            token,
            user,
        }
    }
}
