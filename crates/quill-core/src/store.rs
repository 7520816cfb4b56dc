//! # Comment Store
//!
//! Thread-safe, cloneable in-memory store of [`Comment`] records keyed by
//! [`CommentId`].
//!
//! ## Locking
//!
//! A single `parking_lot::RwLock` guards the whole map. Reads (`get`,
//! `list`, `list_by_owner`, `count`) share the lock; writes (`create`,
//! `update`, `delete`, `delete_by_owner`, `delete_older_than`) take it
//! exclusively, so writes are linearized and a `list` never observes a
//! partial write. All operations are synchronous: the lock is never held
//! across an `.await` and every critical section is O(1) or a single pass
//! over the map. `parking_lot` locks do not poison, so a panicking writer
//! cannot wedge the store.
//!
//! ## Cancellation
//!
//! Every operation takes the caller's [`CancellationToken`]. The token is
//! checked once the lock is held and before anything is read or written;
//! a cancelled call returns [`StoreError::Cancelled`] and leaves the store
//! untouched.
//!
//! ## Copies
//!
//! Accessors return owned clones. The map is never handed out by reference.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use crate::comment::{Comment, CommentDraft, CommentId, OwnerId};
use crate::error::StoreError;

/// Concurrency-safe comment collection. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    data: Arc<RwLock<HashMap<CommentId, Comment>>>,
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), StoreError> {
    if cancel.is_cancelled() {
        Err(StoreError::Cancelled)
    } else {
        Ok(())
    }
}

impl CommentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new comment, stamping a fresh identifier and the current time.
    pub fn create(
        &self,
        cancel: &CancellationToken,
        draft: CommentDraft,
    ) -> Result<Comment, StoreError> {
        let mut guard = self.data.write();
        ensure_live(cancel)?;

        let mut id = CommentId::generate();
        while guard.contains_key(&id) {
            id = CommentId::generate();
        }

        let comment = Comment {
            id: id.clone(),
            content: draft.content,
            author: draft.author,
            created_at: Utc::now(),
            owner_id: draft.owner_id,
        };
        guard.insert(id, comment.clone());
        Ok(comment)
    }

    /// Retrieve a comment by ID.
    pub fn get(&self, cancel: &CancellationToken, id: &CommentId) -> Result<Comment, StoreError> {
        let guard = self.data.read();
        ensure_live(cancel)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Snapshot of every comment, in no particular order.
    pub fn list(&self, cancel: &CancellationToken) -> Result<Vec<Comment>, StoreError> {
        let guard = self.data.read();
        ensure_live(cancel)?;
        Ok(guard.values().cloned().collect())
    }

    /// Replace the content and author of an existing comment.
    ///
    /// `id`, `created_at` and `owner_id` are carried over from the stored
    /// record regardless of the draft. In particular the draft's `owner_id`
    /// is discarded, so ownership can never be transferred through an update.
    pub fn update(
        &self,
        cancel: &CancellationToken,
        id: &CommentId,
        draft: CommentDraft,
    ) -> Result<Comment, StoreError> {
        let mut guard = self.data.write();
        ensure_live(cancel)?;

        let existing = guard
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        existing.content = draft.content;
        existing.author = draft.author;
        Ok(existing.clone())
    }

    /// Remove a comment by ID.
    pub fn delete(&self, cancel: &CancellationToken, id: &CommentId) -> Result<(), StoreError> {
        let mut guard = self.data.write();
        ensure_live(cancel)?;
        guard
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Every comment owned by `owner`, in no particular order.
    pub fn list_by_owner(
        &self,
        cancel: &CancellationToken,
        owner: &OwnerId,
    ) -> Result<Vec<Comment>, StoreError> {
        let guard = self.data.read();
        ensure_live(cancel)?;
        Ok(guard
            .values()
            .filter(|c| c.is_owned_by(owner))
            .cloned()
            .collect())
    }

    /// Remove every comment owned by `owner`. Returns how many were removed.
    pub fn delete_by_owner(
        &self,
        cancel: &CancellationToken,
        owner: &OwnerId,
    ) -> Result<usize, StoreError> {
        let mut guard = self.data.write();
        ensure_live(cancel)?;
        let before = guard.len();
        guard.retain(|_, c| !c.is_owned_by(owner));
        Ok(before - guard.len())
    }

    /// Remove every comment created more than `age` ago. Returns how many
    /// were removed.
    ///
    /// An `age` reaching past the earliest representable time removes
    /// nothing.
    pub fn delete_older_than(
        &self,
        cancel: &CancellationToken,
        age: chrono::Duration,
    ) -> Result<usize, StoreError> {
        let cutoff = Utc::now().checked_sub_signed(age);
        let mut guard = self.data.write();
        ensure_live(cancel)?;
        let Some(cutoff) = cutoff else {
            return Ok(0);
        };
        let before = guard.len();
        guard.retain(|_, c| c.created_at >= cutoff);
        Ok(before - guard.len())
    }

    /// Number of stored comments.
    pub fn count(&self, cancel: &CancellationToken) -> Result<usize, StoreError> {
        let guard = self.data.read();
        ensure_live(cancel)?;
        Ok(guard.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(name: &str) -> OwnerId {
        OwnerId::new(name).unwrap()
    }

    fn draft(content: &str, who: &str) -> CommentDraft {
        CommentDraft {
            content: content.to_string(),
            author: who.to_uppercase(),
            owner_id: owner(who),
        }
    }

    fn cancelled() -> CancellationToken {
        let token = CancellationToken::new();
        token.cancel();
        token
    }

    #[test]
    fn new_store_is_empty() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        assert_eq!(store.count(&live).unwrap(), 0);
        assert!(store.list(&live).unwrap().is_empty());
    }

    #[test]
    fn create_then_get_returns_equal_record() {
        let store = CommentStore::new();
        let live = CancellationToken::new();

        let created = store.create(&live, draft("first!", "alice")).unwrap();
        assert_eq!(created.id.as_str().len(), crate::id::ID_LEN);
        assert_eq!(created.owner_id, owner("alice"));

        let fetched = store.get(&live, &created.id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn get_missing_returns_not_found() {
        let store = CommentStore::new();
        let id = CommentId::new("nope");
        assert_eq!(
            store.get(&CancellationToken::new(), &id),
            Err(StoreError::NotFound(id))
        );
    }

    #[test]
    fn update_replaces_content_and_pins_identity_fields() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        let created = store.create(&live, draft("before", "alice")).unwrap();

        let tampered = CommentDraft {
            content: "after".to_string(),
            author: "Mallory".to_string(),
            owner_id: owner("mallory"),
        };
        let updated = store.update(&live, &created.id, tampered).unwrap();

        assert_eq!(updated.content, "after");
        assert_eq!(updated.author, "Mallory");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.owner_id, owner("alice"));
        assert_eq!(store.get(&live, &created.id).unwrap(), updated);
    }

    #[test]
    fn update_missing_returns_not_found() {
        let store = CommentStore::new();
        let result = store.update(
            &CancellationToken::new(),
            &CommentId::new("missing"),
            draft("x", "alice"),
        );
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn delete_is_idempotent_failure() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        let created = store.create(&live, draft("bye", "alice")).unwrap();

        store.delete(&live, &created.id).unwrap();
        assert!(matches!(
            store.get(&live, &created.id),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(&live, &created.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn list_by_owner_and_delete_by_owner_scope_to_owner() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        store.create(&live, draft("a1", "alice")).unwrap();
        store.create(&live, draft("a2", "alice")).unwrap();
        let bobs = store.create(&live, draft("b1", "bob")).unwrap();

        let alices = store.list_by_owner(&live, &owner("alice")).unwrap();
        assert_eq!(alices.len(), 2);
        assert!(alices.iter().all(|c| c.owner_id == owner("alice")));

        assert_eq!(store.delete_by_owner(&live, &owner("alice")).unwrap(), 2);
        assert_eq!(store.list(&live).unwrap(), vec![bobs]);
        assert!(store.list_by_owner(&live, &owner("alice")).unwrap().is_empty());
    }

    #[test]
    fn delete_older_than_removes_only_stale_records() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        let stale = store.create(&live, draft("old", "alice")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(60));
        let fresh = store.create(&live, draft("new", "alice")).unwrap();

        let removed = store
            .delete_older_than(&live, chrono::Duration::milliseconds(30))
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.get(&live, &stale.id).is_err());
        assert!(store.get(&live, &fresh.id).is_ok());
    }

    #[test]
    fn delete_older_than_with_long_age_keeps_everything() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        store.create(&live, draft("one", "alice")).unwrap();
        store.create(&live, draft("two", "bob")).unwrap();

        let removed = store
            .delete_older_than(&live, chrono::Duration::hours(1))
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(store.count(&live).unwrap(), 2);
    }

    #[test]
    fn delete_older_than_with_unrepresentable_age_removes_nothing() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        store.create(&live, draft("one", "alice")).unwrap();

        assert_eq!(
            store.delete_older_than(&live, chrono::Duration::MAX),
            Ok(0)
        );
        assert_eq!(store.count(&live).unwrap(), 1);

        // The store is still writable afterwards.
        store.create(&live, draft("two", "bob")).unwrap();
        assert_eq!(store.count(&live).unwrap(), 2);
    }

    #[test]
    fn cancelled_token_aborts_every_operation_without_mutation() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        let existing = store.create(&live, draft("keep", "alice")).unwrap();
        let dead = cancelled();

        assert_eq!(
            store.create(&dead, draft("nope", "alice")),
            Err(StoreError::Cancelled)
        );
        assert_eq!(store.get(&dead, &existing.id), Err(StoreError::Cancelled));
        assert_eq!(store.list(&dead), Err(StoreError::Cancelled));
        assert_eq!(
            store.update(&dead, &existing.id, draft("changed", "alice")),
            Err(StoreError::Cancelled)
        );
        assert_eq!(store.delete(&dead, &existing.id), Err(StoreError::Cancelled));
        assert_eq!(
            store.list_by_owner(&dead, &owner("alice")),
            Err(StoreError::Cancelled)
        );
        assert_eq!(
            store.delete_by_owner(&dead, &owner("alice")),
            Err(StoreError::Cancelled)
        );
        assert_eq!(
            store.delete_older_than(&dead, chrono::Duration::zero()),
            Err(StoreError::Cancelled)
        );
        assert_eq!(store.count(&dead), Err(StoreError::Cancelled));

        assert_eq!(store.list(&live).unwrap(), vec![existing]);
    }

    #[test]
    fn clone_shares_underlying_data() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        let clone = store.clone();

        let created = clone.create(&live, draft("shared", "alice")).unwrap();
        assert_eq!(store.get(&live, &created.id).unwrap(), created);
    }

    #[test]
    fn returned_records_are_independent_copies() {
        let store = CommentStore::new();
        let live = CancellationToken::new();
        let mut created = store.create(&live, draft("original", "alice")).unwrap();

        created.content = "mutated locally".to_string();
        assert_eq!(store.get(&live, &created.id).unwrap().content, "original");
    }
}
