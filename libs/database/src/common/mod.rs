//! Utilities shared by the storage backends

pub mod retry;

pub use retry::{RetryConfig, retry, retry_with_backoff};
