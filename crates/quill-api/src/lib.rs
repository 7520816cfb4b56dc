//! # quill-api: Axum API Service for Quill
//!
//! Authenticated comment CRUD over the in-memory
//! [`CommentStore`](quill_core::CommentStore), fronted by a bearer-token
//! gate backed by [`TokenService`](quill_auth::TokenService).
//!
//! ## API Surface
//!
//! | Route                        | Module                 | Auth          |
//! |------------------------------|------------------------|---------------|
//! | `GET /healthz`               | [`routes::health`]     | public        |
//! | `POST /api/v1/login`         | [`routes::login`]      | public        |
//! | `/api/v1/comments[/{id}]`    | [`routes::comments`]   | bearer        |
//! | `GET /openapi.json`          | [`openapi`]            | bearer        |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CORS → RequestContext → TraceLayer → Metrics → Auth (protected routes) → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// The auth gate is attached with `route_layer`, so it only runs for
/// matched protected routes: unknown paths still 404 and the public routes
/// never see it.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(routes::comments::router())
        .merge(openapi::router())
        .route_layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    let public = Router::new()
        .merge(routes::health::router())
        .merge(routes::login::router());

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(from_fn_with_state(
            state.metrics.clone(),
            middleware::metrics::metrics_middleware,
        ))
        .layer(middleware::tracing_layer::layer())
        .layer(from_fn(
            middleware::request_context::request_context_middleware,
        ))
        .layer(middleware::cors::layer())
        .with_state(state)
}
