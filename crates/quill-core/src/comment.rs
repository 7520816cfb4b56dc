//! # Comment Records
//!
//! The single resource managed by Quill. A [`Comment`] is only ever
//! constructed by the [`CommentStore`](crate::store::CommentStore): callers
//! describe what they want stored with a [`CommentDraft`], and the store
//! stamps the identity-bearing fields (`id`, `created_at`) at insertion.
//!
//! ## Immutability
//!
//! `id`, `created_at`, and `owner_id` are fixed for the lifetime of a record.
//! Updates replace `content` and `author` only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Maximum length of a comment body, in characters.
pub const MAX_CONTENT_CHARS: usize = 1000;

/// Opaque, URL-safe comment identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    /// Wrap an identifier received from a caller (e.g. a URL path segment).
    ///
    /// No format check is applied: an identifier the store never issued
    /// simply resolves to `NotFound`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier.
    pub(crate) fn generate() -> Self {
        Self(crate::id::generate_id())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the subject that owns a comment.
///
/// This is the token subject of the caller that created the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Create an owner identity from a token subject.
    ///
    /// Returns [`ValidationError::EmptyOwner`] if the subject is blank.
    pub fn new(subject: impl Into<String>) -> Result<Self, ValidationError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(ValidationError::EmptyOwner);
        }
        Ok(Self(subject))
    }

    /// Return the owner identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    /// The subject that created this comment. Only this subject may update
    /// or delete it.
    #[serde(rename = "user_id")]
    pub owner_id: OwnerId,
}

impl Comment {
    /// Whether `subject` owns this comment.
    pub fn is_owned_by(&self, subject: &OwnerId) -> bool {
        &self.owner_id == subject
    }
}

/// Caller-supplied fields for creating or updating a comment.
///
/// On `create` the draft's `owner_id` becomes the record owner. On `update`
/// it is ignored: ownership is pinned to the existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub content: String,
    pub author: String,
    pub owner_id: OwnerId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_rejects_blank() {
        assert_eq!(OwnerId::new(""), Err(ValidationError::EmptyOwner));
        assert_eq!(OwnerId::new("   "), Err(ValidationError::EmptyOwner));
        assert_eq!(OwnerId::new("alice").unwrap().as_str(), "alice");
    }

    #[test]
    fn comment_serializes_owner_as_user_id() {
        let comment = Comment {
            id: CommentId::new("abc"),
            content: "hello".to_string(),
            author: "Alice".to_string(),
            created_at: Utc::now(),
            owner_id: OwnerId::new("alice").unwrap(),
        };
        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["user_id"], "alice");
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn is_owned_by_compares_subjects() {
        let comment = Comment {
            id: CommentId::new("abc"),
            content: "hello".to_string(),
            author: "Alice".to_string(),
            created_at: Utc::now(),
            owner_id: OwnerId::new("alice").unwrap(),
        };
        assert!(comment.is_owned_by(&OwnerId::new("alice").unwrap()));
        assert!(!comment.is_owned_by(&OwnerId::new("bob").unwrap()));
    }
}
