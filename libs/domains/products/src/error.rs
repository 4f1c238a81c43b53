use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::StoreError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid product id '{0}'")]
    InvalidId(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// The store refused to open a cursor for a list query
    #[error("Unable to query products: {0}")]
    QueryFailed(StoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::InvalidId(raw) => {
                AppError::InvalidId(format!("'{}' is not a valid product id", raw))
            }
            ProductError::InvalidPayload(msg) => AppError::BadRequest(msg),
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::QueryFailed(e) => {
                tracing::error!("Unable to find the products: {}", e);
                AppError::NotFound("Unable to find the products".to_string())
            }
            ProductError::Storage(StoreError::Timeout(limit)) => {
                AppError::StorageTimeout(format!("product store call exceeded {:?}", limit))
            }
            ProductError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::time::Duration;

    fn status(err: ProductError) -> StatusCode {
        AppError::from(err).status()
    }

    #[test]
    fn test_client_errors() {
        assert_eq!(status(ProductError::InvalidId("xyz".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(ProductError::InvalidPayload("not an object".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(ProductError::Validation(ValidationErrors::new())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(ProductError::NotFound("abc".into())), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_failed_list_query_is_not_found() {
        let err = ProductError::QueryFailed(StoreError::Backend("socket closed".into()));
        assert_eq!(status(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_failures_are_internal() {
        assert_eq!(
            status(ProductError::Storage(StoreError::Backend("boom".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let timeout = AppError::from(ProductError::Storage(StoreError::Timeout(
            Duration::from_secs(1),
        )));
        assert!(matches!(timeout, AppError::StorageTimeout(_)));
    }
}
