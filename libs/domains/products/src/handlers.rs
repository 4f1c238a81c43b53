//! HTTP handlers for Products API

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Query, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use axum_helpers::{
    AppError, ObjectIdPath, TokenIssuer,
    errors::responses::{
        BadRequestIdResponse, BadRequestPayloadResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    require_admin, require_token,
};
use database::DocumentCollection;
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{Product, ProductPayload, ProductResponse};
use crate::service::ProductService;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_products,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(ProductPayload, ProductResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            BadRequestPayloadResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router.
///
/// Reads are public. Create and update need a valid token and are bounded by
/// `body_limit`; delete needs a token with the `authorized` claim.
/// `/product/{id}` answers GET and DELETE like `/products/{id}`.
pub fn router<S>(service: ProductService<S>, issuer: TokenIssuer, body_limit: usize) -> Router
where
    S: DocumentCollection<Product> + 'static,
{
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/product/{id}", get(get_product));

    let writes = Router::new()
        .route("/products", post(create_products))
        .route("/products/{id}", put(update_product))
        .layer(DefaultBodyLimit::max(body_limit))
        .route_layer(from_fn_with_state(issuer.clone(), require_token));

    let admin = Router::new()
        .route("/products/{id}", delete(delete_product))
        .route("/product/{id}", delete(delete_product))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(issuer, require_token));

    public
        .merge(writes)
        .merge(admin)
        .with_state(shared_service)
}

/// List products, filtered by query parameters
///
/// Each parameter is an equality match on the field of the same name
/// (first value wins). `_id` must be a valid document id.
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(
        ("_id" = Option<String>, Query, description = "Document id (24 hex digits)"),
        ("product_name" = Option<String>, Query, description = "Exact product name"),
        ("vendor" = Option<String>, Query, description = "Exact vendor"),
        ("currency" = Option<String>, Query, description = "Exact currency code"),
    ),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductResponse>),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<S: DocumentCollection<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ProductResult<Json<Vec<ProductResponse>>> {
    let products = service.list_products(&params).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Create a batch of products
///
/// Returns the new ids in request order.
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = Vec<ProductPayload>,
    responses(
        (status = 201, description = "Products created", body = Vec<String>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_products<S: DocumentCollection<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    payload: Result<Json<Vec<ProductPayload>>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(candidates) = payload?;
    let ids = service.create_products(candidates).await?;
    let ids: Vec<String> = ids.iter().map(|id| id.to_hex()).collect();
    Ok((StatusCode::CREATED, Json(ids)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<S: DocumentCollection<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.get_product(id).await?;
    Ok(Json(product.into()))
}

/// Update a product
///
/// Fields present in the body replace the stored ones; the rest are kept.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<S: DocumentCollection<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let Json(patch) = payload?;
    let product = service.update_product(id, patch).await?;
    Ok(Json(product.into()))
}

/// Delete a product
///
/// Answers with the number of deleted products; an unknown id gives 0.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted count", body = u64),
        (status = 400, response = BadRequestIdResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<S: DocumentCollection<Product>>(
    State(service): State<Arc<ProductService<S>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ProductResult<Json<u64>> {
    let deleted = service.delete_product(id).await?;
    Ok(Json(deleted))
}
