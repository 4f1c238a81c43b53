//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has passed its `Validate` constraints.
///
/// Decoding failures reject with `INVALID_PAYLOAD` (400, or 413 when the body
/// limit was hit); constraint violations reject with `VALIDATION_ERROR` and
/// per-field details. The handler never sees an invalid value.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct Credentials {
///     #[validate(email)]
///     email: String,
///     #[validate(length(min = 8, max = 300))]
///     password: String,
/// }
///
/// async fn register(ValidatedJson(input): ValidatedJson<Credentials>) -> String {
///     input.email
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::post};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Credentials {
        #[validate(email)]
        email: String,
    }

    async fn handler(ValidatedJson(input): ValidatedJson<Credentials>) -> String {
        input.email
    }

    fn app() -> Router {
        Router::new().route("/", post(handler))
    }

    fn request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_reaches_handler() {
        let response = app()
            .oneshot(request(r#"{"email":"bob@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_constraint_violation_is_bad_request() {
        let response = app()
            .oneshot(request(r#"{"email":"not-an-email"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = app().oneshot(request(r#"{"email":"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_bad_request() {
        let response = app().oneshot(request(r#"{"email":42}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
