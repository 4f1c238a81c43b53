//! Users Domain
//!
//! Registration and password authentication for catalog users.
//!
//! - Passwords are hashed with Argon2 and never stored in plaintext
//! - Email uniqueness is enforced by a unique index on the users collection
//! - A successful registration or login returns a signed access token in the
//!   `x-auth-token` header; the body only carries the email
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtConfig, TokenIssuer};
//! use domain_users::{User, UserService, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let users = client.database("catalog").collection::<User>("users");
//!
//! let issuer = TokenIssuer::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-chars")?);
//! let service = UserService::new(users, issuer);
//! service.init_indexes().await?;
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{AuthResponse, Authenticated, LoginRequest, RegisterUser, User};
pub use service::UserService;
