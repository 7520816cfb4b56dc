//! # Comments API
//!
//! Authenticated CRUD over comments. Any authenticated caller may create,
//! list, and read; only the owner may update or delete.
//!
//! Store calls carry the request's cancellation token, so work stops if the
//! client goes away.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use quill_core::{Comment, CommentDraft, CommentId, MAX_CONTENT_CHARS};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::auth::{require_owner, CallerIdentity};
use crate::error::{AppError, FieldErrors};
use crate::extractors::{extract_validated_json, is_blank, Validate};
use crate::middleware::request_context::RequestContext;
use crate::state::AppState;

/// Request body for creating or updating a comment. Missing fields
/// deserialize as empty and are reported by validation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    /// Comment body, at most 1000 characters.
    #[serde(default)]
    pub content: String,
    /// Display name shown with the comment.
    #[serde(default)]
    pub author: String,
}

impl Validate for CommentRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if is_blank(&self.content) {
            errors.add("content", "content is required");
        } else if self.content.chars().count() > MAX_CONTENT_CHARS {
            errors.add(
                "content",
                format!("content must be less than {MAX_CONTENT_CHARS} characters"),
            );
        }
        if is_blank(&self.author) {
            errors.add("author", "author is required");
        }
        errors.into_result()
    }
}

impl CommentRequest {
    fn into_draft(self, caller: &CallerIdentity) -> CommentDraft {
        CommentDraft {
            content: self.content,
            author: self.author,
            owner_id: caller.subject.clone(),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/comments", get(list_comments).post(create_comment))
        .route(
            "/api/v1/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}

/// POST /api/v1/comments: Create a comment owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/comments",
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = Comment),
        (status = 400, description = "Validation error", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
    ),
    security(("bearer_token" = [])),
    tag = "comments"
)]
async fn create_comment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ctx: RequestContext,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let req = extract_validated_json(body)?;
    let comment = state
        .comments
        .create(&ctx.cancel, req.into_draft(&caller))?;
    tracing::info!(comment_id = %comment.id, subject = %caller.subject, "comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/comments: List all comments.
#[utoipa::path(
    get,
    path = "/api/v1/comments",
    responses(
        (status = 200, description = "All comments, unordered", body = Vec<Comment>),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
    ),
    security(("bearer_token" = [])),
    tag = "comments"
)]
async fn list_comments(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(state.comments.list(&ctx.cancel)?))
}

/// GET /api/v1/comments/{id}: Fetch one comment.
#[utoipa::path(
    get,
    path = "/api/v1/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 200, description = "Comment found", body = Comment),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 404, description = "Comment not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_token" = [])),
    tag = "comments"
)]
async fn get_comment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Comment>, AppError> {
    let comment = state.comments.get(&ctx.cancel, &CommentId::new(id))?;
    Ok(Json(comment))
}

/// PUT /api/v1/comments/{id}: Replace content and author. Owner only.
///
/// The body is validated first, then the record is loaded (404), then
/// ownership is checked (403).
#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 400, description = "Validation error", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 403, description = "Caller does not own the comment", body = crate::error::ErrorBody),
        (status = 404, description = "Comment not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_token" = [])),
    tag = "comments"
)]
async fn update_comment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<Comment>, AppError> {
    let req = extract_validated_json(body)?;
    let id = CommentId::new(id);

    // Owner is immutable and ids are never reused.
    let existing = state.comments.get(&ctx.cancel, &id)?;
    require_owner(&caller, &existing)?;

    let updated = state
        .comments
        .update(&ctx.cancel, &id, req.into_draft(&caller))?;
    tracing::info!(comment_id = %updated.id, "comment updated");
    Ok(Json(updated))
}

/// DELETE /api/v1/comments/{id}: Remove a comment. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = String, Path, description = "Comment identifier")),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorBody),
        (status = 403, description = "Caller does not own the comment", body = crate::error::ErrorBody),
        (status = 404, description = "Comment not found", body = crate::error::ErrorBody),
    ),
    security(("bearer_token" = [])),
    tag = "comments"
)]
async fn delete_comment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = CommentId::new(id);
    let existing = state.comments.get(&ctx.cancel, &id)?;
    require_owner(&caller, &existing)?;

    state.comments.delete(&ctx.cancel, &id)?;
    tracing::info!(comment_id = %id, "comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
