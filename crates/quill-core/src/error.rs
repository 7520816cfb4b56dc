//! # Store Errors

use thiserror::Error;

use crate::comment::CommentId;

/// Errors returned by [`CommentStore`](crate::store::CommentStore) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No comment exists with the given identifier.
    #[error("comment {0} not found")]
    NotFound(CommentId),

    /// The caller's cancellation token fired before the operation took
    /// effect. The store was not modified.
    #[error("operation cancelled")]
    Cancelled,
}

/// A record field failed a domain rule at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Owner identities are token subjects and may not be blank.
    #[error("owner identity must not be empty")]
    EmptyOwner,
}
