//! Type-safe error codes for API responses.
//!
//! Each code has a client-facing identifier (`as_str`), an integer for logs
//! and dashboards (`code`) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidId;
//! assert_eq!(code.as_str(), "INVALID_ID");
//! assert_eq!(code.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1499)
    /// A field constraint was violated
    ValidationError,

    /// Path or query identifier is not a valid document id
    InvalidId,

    /// Request body could not be decoded
    InvalidPayload,

    NotFound,

    /// Missing or invalid credentials or token
    Unauthorized,

    /// Valid token without the required authorization
    Forbidden,

    /// Unique key already taken
    Conflict,

    PayloadTooLarge,

    // Server errors (1500-1999)
    InternalError,

    ServiceUnavailable,

    // Storage errors (2000-2999)
    StorageError,

    StorageTimeout,

    // Credential errors (3000-3999)
    PasswordHash,

    TokenSigning,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::StorageError => "STORAGE_ERROR",
            Self::StorageTimeout => "STORAGE_TIMEOUT",
            Self::PasswordHash => "PASSWORD_HASH",
            Self::TokenSigning => "TOKEN_SIGNING",
        }
    }

    /// Integer code used in structured logs
    ///
    /// - 1000-1499: client errors
    /// - 1500-1999: generic server errors
    /// - 2000-2999: storage errors
    /// - 3000-3999: credential errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::InvalidPayload => 1003,
            Self::NotFound => 1004,
            Self::Unauthorized => 1005,
            Self::Forbidden => 1006,
            Self::Conflict => 1007,
            Self::PayloadTooLarge => 1008,

            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1501,

            Self::StorageError => 2001,
            Self::StorageTimeout => 2002,

            Self::PasswordHash => 3001,
            Self::TokenSigning => 3002,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid identifier format",
            Self::InvalidPayload => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::Conflict => "Resource already exists",
            Self::PayloadTooLarge => "Request body is too large",
            // Server-side codes share one message so driver text never reaches clients
            Self::InternalError
            | Self::StorageError
            | Self::StorageTimeout
            | Self::PasswordHash
            | Self::TokenSigning => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
