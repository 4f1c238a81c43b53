use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode, TokenError};
use database::StoreError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User {0} does not exist")]
    NotFound(String),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token signing error: {0}")]
    TokenSigning(#[from] TokenError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(email) => {
                AppError::NotFound(format!("User {} does not exist", email))
            }
            UserError::DuplicateEmail(email) => {
                AppError::Conflict(format!("User with email {} already exists", email))
            }
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            UserError::Validation(errors) => AppError::ValidationError(errors),
            UserError::PasswordHash(reason) => AppError::Internal {
                code: ErrorCode::PasswordHash,
                reason,
            },
            UserError::TokenSigning(e) => AppError::Internal {
                code: ErrorCode::TokenSigning,
                reason: e.to_string(),
            },
            UserError::Storage(StoreError::Timeout(limit)) => {
                AppError::StorageTimeout(format!("user store call exceeded {:?}", limit))
            }
            UserError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
