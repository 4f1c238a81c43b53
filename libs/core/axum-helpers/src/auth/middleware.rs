use super::jwt::{TOKEN_HEADER, TokenClaims, TokenIssuer};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

/// Token from `x-auth-token` or `Authorization`.
///
/// `x-auth-token` accepts `Bearer <jwt>`, `Bearer<jwt>` and a bare token.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_custom = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|raw| raw.trim())
        .map(|raw| raw.strip_prefix("Bearer").unwrap_or(raw).trim())
        .filter(|token| !token.is_empty());

    let from_authorization = || {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    };

    from_custom.or_else(from_authorization).map(str::to_string)
}

/// Reject requests without a valid, unexpired token.
///
/// On success the decoded [`TokenClaims`] are inserted into the request
/// extensions for downstream layers and handlers.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/products", post(create_products))
///     .route_layer(axum::middleware::from_fn_with_state(issuer, require_token));
/// ```
pub async fn require_token(
    State(issuer): State<TokenIssuer>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token(request.headers()) else {
        tracing::debug!("No token in x-auth-token or Authorization header");
        return Err(AppError::Unauthorized("missing token".to_string()));
    };

    let claims = issuer.verify(&token).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AppError::Unauthorized("invalid or expired token".to_string())
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Reject tokens whose `authorized` claim is false.
///
/// Must run after [`require_token`]; add it as the inner layer.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let Some(claims) = request.extensions().get::<TokenClaims>() else {
        return Err(AppError::Unauthorized("missing token".to_string()));
    };

    if !claims.authorized {
        tracing::info!(email = %claims.email, "Rejected non-admin token");
        return Err(AppError::Forbidden("not authorized".to_string()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, bearer};
    use axum::{
        Extension, Router,
        body::Body,
        http::{HeaderValue, StatusCode},
        middleware::{from_fn, from_fn_with_state},
        routing::{delete, post},
    };
    use tower::ServiceExt;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&JwtConfig::new("middleware-test-secret-32-characters").unwrap())
    }

    async fn echo_email(Extension(claims): Extension<TokenClaims>) -> String {
        claims.email
    }

    fn app(issuer: TokenIssuer) -> Router {
        Router::new()
            .route("/write", post(echo_email))
            .route(
                "/admin",
                delete(echo_email).route_layer(from_fn(require_admin)),
            )
            .route_layer(from_fn_with_state(issuer, require_token))
    }

    async fn call(method: &str, uri: &str, header: Option<(&str, String)>) -> StatusCode {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some((name, value)) = header {
            builder = builder.header(name, HeaderValue::from_str(&value).unwrap());
        }
        app(issuer())
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn test_extract_token_variants() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("Bearer abc"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));

        headers.insert(TOKEN_HEADER, HeaderValue::from_static("Bearerabc"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));

        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));

        assert!(extract_token(&HeaderMap::new()).is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        assert_eq!(call("POST", "/write", None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let header = Some((TOKEN_HEADER, bearer("forged.token.value")));
        assert_eq!(call("POST", "/write", header).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let token = issuer().issue("bob@example.com", false).unwrap();
        let header = Some((TOKEN_HEADER, bearer(&token)));
        assert_eq!(call("POST", "/write", header).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_authorization_header_is_accepted() {
        let token = issuer().issue("bob@example.com", false).unwrap();
        let header = Some(("authorization", bearer(&token)));
        assert_eq!(call("POST", "/write", header).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() {
        let token = issuer().issue("bob@example.com", false).unwrap();
        let header = Some((TOKEN_HEADER, bearer(&token)));
        assert_eq!(call("DELETE", "/admin", header).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let token = issuer().issue("root@example.com", true).unwrap();
        let header = Some((TOKEN_HEADER, bearer(&token)));
        assert_eq!(call("DELETE", "/admin", header).await, StatusCode::OK);
    }
}
