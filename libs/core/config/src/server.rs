use crate::{env_or_default, env_parse_opt, env_parse_or, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a single request, storage calls included
    pub request_timeout: Duration,
    /// Upper bound for a single storage call; always below `request_timeout`
    pub store_timeout: Duration,
    /// Maximum accepted request body on write routes
    pub body_limit: usize,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: 0.0.0.0
    /// - PORT: 8080
    /// - REQUEST_TIMEOUT_SECS: 10
    /// - STORE_TIMEOUT_SECS: half the request timeout
    /// - BODY_LIMIT_BYTES: 1 MiB
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse_or("PORT", DEFAULT_PORT)?;
        let timeout_secs = env_parse_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let body_limit = env_parse_or("BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?;

        if timeout_secs == 0 {
            return Err(ConfigError::ParseError {
                key: "REQUEST_TIMEOUT_SECS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        let request_timeout = Duration::from_secs(timeout_secs);
        let store_timeout = match env_parse_opt::<u64>("STORE_TIMEOUT_SECS")? {
            Some(secs) => Duration::from_secs(secs),
            None => request_timeout / 2,
        };
        if store_timeout.is_zero() || store_timeout >= request_timeout {
            return Err(ConfigError::ParseError {
                key: "STORE_TIMEOUT_SECS".to_string(),
                details: "must be greater than zero and below REQUEST_TIMEOUT_SECS".to_string(),
            });
        }

        Ok(Self {
            host,
            port,
            request_timeout,
            store_timeout,
            body_limit,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: DEFAULT_PORT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            store_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS) / 2,
            body_limit: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}
