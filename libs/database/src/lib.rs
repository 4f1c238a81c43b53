//! Document storage for catalog services
//!
//! The [`store`] module defines the storage port every domain service talks
//! to. Two backends implement it:
//!
//! - `mongodb::Collection<T>` (see [`mongodb`]) for deployed services
//! - [`store::MemoryCollection`] for tests and local runs without a database
//!
//! # Features
//!
//! - `config` (default) - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config};
//! use database::store::DocumentCollection;
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "catalog");
//! let client = connect_from_config(&config).await?;
//! let products = client.database(&config.database).collection::<Product>("products");
//! let found = products.find_one(doc! { "vendor": "Google" }).await?;
//! ```

pub mod common;
pub mod mongodb;
pub mod store;

pub use common::{RetryConfig, retry, retry_with_backoff};
pub use store::{
    DocumentCollection, DocumentCursor, MemoryCollection, StoreError, StoreResult, with_deadline,
};
