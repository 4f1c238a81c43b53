//! # Axum Helpers
//!
//! Shared HTTP plumbing for the catalog services.
//!
//! ## Modules
//!
//! - **[`auth`]**: access token issuance and the `require_token` / `require_admin` guards
//! - **[`server`]**: router setup, health checks, graceful shutdown
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: document id path and validated JSON extractors
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! let config = ServerConfig::default();
//! let router = create_router::<ApiDoc>(api_routes, &config);
//! create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod server;

pub use auth::{
    ACCESS_TOKEN_TTL, JwtConfig, TOKEN_HEADER, TokenClaims, TokenError, TokenIssuer, bearer,
    require_admin, require_token,
};

pub use server::{
    CORRELATION_ID_HEADER, HealthCheckFuture, HealthResponse, ShutdownCoordinator,
    create_production_app, create_router, health_router, normalize_paths, run_health_checks,
    shutdown_signal,
};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{ObjectIdPath, ValidatedJson, parse_object_id};
