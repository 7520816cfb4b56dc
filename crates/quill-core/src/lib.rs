//! # quill-core: Comment Records and the Comment Store
//!
//! Leaf crate of the Quill workspace. Defines the comment record, its
//! identifier and owner newtypes, URL-safe identifier generation, and the
//! concurrent in-memory [`CommentStore`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `quill-*` crates.
//! - No HTTP concerns: the store knows nothing about requests, tokens, or
//!   status codes.
//! - No `.unwrap()` outside tests.

pub mod comment;
pub mod error;
pub mod id;
pub mod store;

pub use comment::{Comment, CommentDraft, CommentId, OwnerId, MAX_CONTENT_CHARS};
pub use error::{StoreError, ValidationError};
pub use store::CommentStore;
