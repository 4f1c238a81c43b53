//! Token-based authentication.
//!
//! - [`TokenIssuer`] mints and verifies HS256 access tokens
//! - [`require_token`] and [`require_admin`] guard mutating routes
//!
//! ```ignore
//! use axum::middleware::{from_fn, from_fn_with_state};
//! use axum_helpers::auth::{JwtConfig, TokenIssuer, require_admin, require_token};
//! use core_config::FromEnv;
//!
//! let issuer = TokenIssuer::new(&JwtConfig::from_env()?);
//!
//! let admin_only = Router::new()
//!     .route("/products/{id}", delete(delete_product))
//!     .route_layer(from_fn(require_admin))
//!     .route_layer(from_fn_with_state(issuer, require_token));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, TOKEN_HEADER, TokenClaims, TokenError, TokenIssuer, bearer};
pub use middleware::{require_admin, require_token};
