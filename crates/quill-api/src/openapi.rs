//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document served
//! at `/openapi.json` (behind the bearer-token gate).

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Assembled OpenAPI spec for the Quill API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quill API",
        version = "0.1.0",
        description = "Authenticated comment service: login, comment CRUD with owner-only mutation, and a liveness probe."
    ),
    paths(
        crate::routes::health::healthz,
        crate::routes::login::login,
        crate::routes::comments::create_comment,
        crate::routes::comments::list_comments,
        crate::routes::comments::get_comment,
        crate::routes::comments::update_comment,
        crate::routes::comments::delete_comment,
    ),
    components(schemas(
        quill_core::Comment,
        quill_core::CommentId,
        quill_core::OwnerId,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::comments::CommentRequest,
        crate::routes::login::LoginRequest,
        crate::routes::login::LoginResponse,
        crate::routes::health::HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "auth", description = "Token issuance"),
        (name = "comments", description = "Comment CRUD"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_token` security scheme referenced by the comment
/// routes.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
