//! # Authentication & Authorization
//!
//! Bearer-token gate for every route except the health probe and login.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: Bearer <jwt>
//! ```
//!
//! The JWT is issued by `POST /api/v1/login` and validated with the
//! [`TokenService`](quill_auth::TokenService) held in [`AppState`]. Requests
//! without a valid token are rejected with 401 before the body is read.
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl.
//! Ownership of individual comments is checked in the handlers with
//! [`require_owner`].

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use quill_auth::{Claims, Role};
use quill_core::{Comment, OwnerId};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

/// Identity of the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Token subject; becomes the owner of comments this caller creates.
    pub subject: OwnerId,
    pub role: Role,
}

impl CallerIdentity {
    pub fn owns(&self, comment: &Comment) -> bool {
        comment.is_owned_by(&self.subject)
    }
}

impl From<Claims> for CallerIdentity {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            role: claims.role,
        }
    }
}

/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present.
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Check that the caller owns `comment`.
/// Returns 403 Forbidden otherwise.
pub fn require_owner(caller: &CallerIdentity, comment: &Comment) -> Result<(), AppError> {
    if caller.owns(comment) {
        Ok(())
    } else {
        tracing::warn!(
            comment_id = %comment.id,
            subject = %caller.subject,
            "ownership check failed"
        );
        Err(AppError::Forbidden(
            "only the owner may modify this comment".into(),
        ))
    }
}

/// Constant-time string comparison.
///
/// When lengths differ, performs a dummy comparison so timing does not
/// depend on how much of the input matched.
pub(crate) fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or("missing authorization header")?
        .to_str()
        .map_err(|_| "authorization header is not valid UTF-8")?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or("authorization header must use the Bearer scheme")?
        .trim();

    if token.is_empty() {
        return Err("empty bearer token");
    }
    Ok(token)
}

/// Authentication middleware.
///
/// Validates the bearer token and injects a [`CallerIdentity`] into request
/// extensions. Fails closed: any extraction or validation failure is a 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(token) => token,
        Err(reason) => {
            tracing::warn!(reason, "authentication rejected");
            return AppError::Unauthorized(reason.into()).into_response();
        }
    };

    match state.tokens.validate(token) {
        Ok(claims) => {
            request
                .extensions_mut()
                .insert(CallerIdentity::from(claims));
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(reason = %err, "authentication rejected");
            AppError::from(err).into_response()
        }
    }
}
