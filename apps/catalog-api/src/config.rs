use axum_helpers::JwtConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use std::str::FromStr;

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Where documents live
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    MongoDb,
    /// Process-local store, lost on exit
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StorageBackend::MongoDb),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Collection names
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionsConfig {
    pub products: String,
    pub users: String,
}

impl FromEnv for CollectionsConfig {
    /// - PRODUCTS_COLLECTION: products
    /// - USERS_COLLECTION: users
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            products: env_or_default("PRODUCTS_COLLECTION", "products"),
            users: env_or_default("USERS_COLLECTION", "users"),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageBackend,
    /// Present when `storage` is MongoDB
    pub mongodb: Option<MongoConfig>,
    pub collections: CollectionsConfig,
    pub jwt: JwtConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let storage = core_config::env_parse_or("STORAGE_BACKEND", StorageBackend::MongoDb)?;
        let mongodb = match storage {
            StorageBackend::MongoDb => Some(MongoConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            storage,
            mongodb,
            collections: CollectionsConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SECRET: &str = "catalog-config-test-secret-0123456789";

    #[test]
    fn test_mongodb_backend_by_default() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", None),
                ("MONGODB_URL", None),
                ("MONGODB_HOST", Some("db.internal")),
                ("MONGODB_PORT", Some("27018")),
                ("MONGODB_DATABASE", Some("tronics")),
                ("PRODUCTS_COLLECTION", None),
                ("USERS_COLLECTION", Some("accounts")),
                ("JWT_SECRET", Some(SECRET)),
                ("REQUEST_TIMEOUT_SECS", Some("5")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.storage, StorageBackend::MongoDb);

                let mongodb = config.mongodb.unwrap();
                assert_eq!(mongodb.url, "mongodb://db.internal:27018");
                assert_eq!(mongodb.database, "tronics");

                assert_eq!(config.collections.products, "products");
                assert_eq!(config.collections.users, "accounts");
                assert_eq!(config.server.request_timeout, Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_memory_backend_needs_no_mongodb_settings() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", Some("memory")),
                ("MONGODB_DATABASE", None),
                ("JWT_SECRET", Some(SECRET)),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.storage, StorageBackend::Memory);
                assert!(config.mongodb.is_none());
            },
        );
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        temp_env::with_vars(
            [("STORAGE_BACKEND", Some("memory")), ("JWT_SECRET", None)],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        temp_env::with_vars(
            [("STORAGE_BACKEND", Some("cassandra")), ("JWT_SECRET", Some(SECRET))],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_backend_names() {
        assert_eq!("MongoDB".parse::<StorageBackend>(), Ok(StorageBackend::MongoDb));
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert!("redis".parse::<StorageBackend>().is_err());
    }
}
