//! MongoDB connection management and the driver-backed storage port
//!
//! `mongodb::Collection<T>` implements [`crate::store::DocumentCollection`]
//! directly, so services take the driver collection as-is.

mod collection;
mod config;
mod connector;
mod health;

pub use config::MongoConfig;
pub use connector::{MongoError, connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health, check_health_detailed};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
