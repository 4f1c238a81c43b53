use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// User entity as stored in the users collection
///
/// `email` carries a unique index. The plaintext password is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Registration request
///
/// Accounts created here are never admins; admin accounts are provisioned
/// directly in the users collection.
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[serde(alias = "username")]
    #[validate(email, length(min = 1))]
    #[schema(example = "bob@example.com")]
    pub email: String,

    #[validate(length(min = 8, max = 300))]
    #[schema(example = "longenoughpassword", min_length = 8, max_length = 300)]
    pub password: String,
}

/// Authentication request
#[derive(Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "username")]
    #[validate(email, length(min = 1))]
    #[schema(example = "bob@example.com")]
    pub email: String,

    #[validate(length(min = 8, max = 300))]
    #[schema(example = "longenoughpassword")]
    pub password: String,
}

impl fmt::Debug for RegisterUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUser")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of a successful registration or authentication.
/// The token travels in the `x-auth-token` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "bob@example.com")]
    pub email: String,
}

/// Result of registration or authentication
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub email: String,
    pub token: String,
}
