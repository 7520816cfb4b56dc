//! # Request Context
//!
//! Attaches a [`RequestContext`] to every request: a generated request id
//! and a cancellation token handed to store operations. The token is
//! cancelled when the request future completes or is dropped (for example
//! when the client disconnects), so store calls made on behalf of an
//! abandoned request stop with `StoreError::Cancelled`.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::AppError;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request-scoped values set by [`request_context_middleware`].
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub cancel: CancellationToken,
}

impl RequestContext {
    /// A fresh context with a new id and a live token.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().simple().to_string(),
            cancel: CancellationToken::new(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or_else(|| AppError::Internal("request context missing".into()))
    }
}

/// Middleware that creates the [`RequestContext`] and echoes its id in the
/// `x-request-id` response header.
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let context = RequestContext::new();
    let request_id = context.request_id.clone();
    // Cancels the token on completion or when this future is dropped.
    let _guard = context.cancel.clone().drop_guard();
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
