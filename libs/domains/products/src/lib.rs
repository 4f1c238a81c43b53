//! Products Domain
//!
//! Product catalog lifecycle over the shared storage port.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, auth guards
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Filter building, validation, merge-on-update
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────────┐
//! │ DocumentCollection<T>   │  ← MongoDB collection or in-memory store
//! └──────┬──────────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, payload, response
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtConfig, TokenIssuer};
//! use domain_products::{Product, ProductService, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let products = client.database("catalog").collection::<Product>("products");
//!
//! let service = ProductService::new(products);
//! let issuer = TokenIssuer::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-chars")?);
//! let router = handlers::router(service, issuer, 1024 * 1024);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use filter::build_filter;
pub use handlers::ApiDoc;
pub use models::{Product, ProductPayload, ProductResponse};
pub use service::{DEFAULT_STORE_TIMEOUT, ProductService};
