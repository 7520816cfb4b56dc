//! Cross-origin policy: any origin, the methods the API serves, and the two
//! request headers clients send.
//!
//! `CorsLayer` short-circuits every `OPTIONS` request with an empty 200, so
//! the router never sees one and bare `OPTIONS` never turns into a 405.

use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

