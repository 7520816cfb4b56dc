//! # Login
//!
//! Exchanges a username and password for an identity token. Credentials are
//! a single fixed pair; there is no user store behind this endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use quill_auth::Role;
use quill_core::OwnerId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::constant_time_eq;
use crate::error::{AppError, FieldErrors};
use crate::extractors::{extract_validated_json, is_blank, Validate};
use crate::state::AppState;

const LOGIN_USERNAME: &str = "test";
const LOGIN_PASSWORD: &str = "test123";

/// Request body for `POST /api/v1/login`. Missing fields deserialize as
/// empty and are reported by validation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if is_blank(&self.username) {
            errors.add("username", "username is required");
        }
        if is_blank(&self.password) {
            errors.add("password", "password is required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_seconds: i64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/login", post(login))
}

/// Both comparisons always run.
fn credentials_match(username: &str, password: &str) -> bool {
    let user_ok = constant_time_eq(username, LOGIN_USERNAME);
    let pass_ok = constant_time_eq(password, LOGIN_PASSWORD);
    user_ok & pass_ok
}

/// POST /api/v1/login: Issue a bearer token for valid credentials.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing username or password", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = extract_validated_json(body)?;

    if !credentials_match(&req.username, &req.password) {
        tracing::warn!(username = %req.username, "invalid login attempt");
        return Err(AppError::Unauthorized("invalid credentials".into()));
    }

    let subject = OwnerId::new(req.username.as_str())?;
    let issued = state.tokens.issue(&subject, &Role::user())?;
    tracing::info!(subject = %subject, expires_at = %issued.expires_at, "login succeeded");

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_in_seconds: issued.expires_in_seconds,
    }))
}
