//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog with token-protected writes",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    components(schemas(axum_helpers::ErrorResponse)),
    modifiers(&TokenHeader)
)]
struct BaseDoc;

/// Registers the `x-auth-token` header as the API key scheme
struct TokenHeader;

impl utoipa::Modify for TokenHeader {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                axum_helpers::TOKEN_HEADER,
                "`Bearer <token>` as returned by POST /users or POST /auth",
            ))),
        );
    }
}

/// Combined OpenAPI documentation for all domains
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = BaseDoc::openapi();
        doc.merge(domain_products::ApiDoc::openapi());
        doc.merge(domain_users::ApiDoc::openapi());
        doc
    }
}
