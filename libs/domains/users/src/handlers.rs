use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_helpers::{
    TOKEN_HEADER, ValidatedJson, bearer,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use database::DocumentCollection;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{AuthResponse, Authenticated, LoginRequest, RegisterUser, User};
use crate::service::UserService;

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(register, authenticate),
    components(
        schemas(RegisterUser, LoginRequest, AuthResponse),
        responses(
            BadRequestValidationResponse,
            ConflictResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "Registration and authentication")
    )
)]
pub struct ApiDoc;

/// Create the users router: `POST /users` registers, `POST /auth` authenticates
pub fn router<S: DocumentCollection<User> + 'static>(service: UserService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/users", post(register))
        .route("/auth", post(authenticate))
        .with_state(shared_service)
}

/// Body plus the token header
fn token_response(status: StatusCode, authenticated: Authenticated) -> impl IntoResponse {
    (
        status,
        [(TOKEN_HEADER, bearer(&authenticated.token))],
        Json(AuthResponse {
            email: authenticated.email,
        }),
    )
}

/// Register a new user
///
/// The access token is returned in the `x-auth-token` header.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = AuthResponse,
            headers(("x-auth-token" = String, description = "Bearer access token"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<S: DocumentCollection<User>>(
    State(service): State<Arc<UserService<S>>>,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> UserResult<impl IntoResponse> {
    let authenticated = service.register(input).await?;
    Ok(token_response(StatusCode::CREATED, authenticated))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/auth",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse,
            headers(("x-auth-token" = String, description = "Bearer access token"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn authenticate<S: DocumentCollection<User>>(
    State(service): State<Arc<UserService<S>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<impl IntoResponse> {
    let authenticated = service.authenticate(input).await?;
    Ok(token_response(StatusCode::OK, authenticated))
}
