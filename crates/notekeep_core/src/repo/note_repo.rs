//! Per-user note list persistence.
//!
//! # Invariants
//! - Each owner's notes live as one JSON array under `notes_<owner>`.
//! - Lists are sorted by `updated_at DESC, id ASC` on load and on save.
//! - A missing key means the owner has no notes yet.

use crate::model::note::{sort_by_recency, Note};
use crate::repo::{RepoError, RepoResult};
use crate::storage::{notes_key, KeyValueStore};
use log::{debug, error};

/// Repository interface for one-list-per-owner note storage.
pub trait NoteRepository {
    /// Loads all notes owned by `owner`, newest first.
    fn load_notes(&self, owner: &str) -> RepoResult<Vec<Note>>;
    /// Replaces the full note list of `owner`. Returns the sorted list written.
    fn save_notes(&self, owner: &str, notes: &[Note]) -> RepoResult<Vec<Note>>;
}

/// Note repository backed by any storage area.
pub struct StorageNoteRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StorageNoteRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> NoteRepository for StorageNoteRepository<S> {
    fn load_notes(&self, owner: &str) -> RepoResult<Vec<Note>> {
        let key = notes_key(owner);
        let Some(raw) = self.store.get_item(&key)? else {
            return Ok(Vec::new());
        };

        let mut notes: Vec<Note> = serde_json::from_str(&raw).map_err(|err| {
            error!("event=notes_load module=repo status=error error_code=notes_decode_failed error={err}");
            RepoError::InvalidData {
                key: key.clone(),
                message: err.to_string(),
            }
        })?;
        sort_by_recency(&mut notes);
        debug!("event=notes_load module=repo status=ok count={}", notes.len());
        Ok(notes)
    }

    fn save_notes(&self, owner: &str, notes: &[Note]) -> RepoResult<Vec<Note>> {
        let mut sorted = notes.to_vec();
        sort_by_recency(&mut sorted);
        let encoded = serde_json::to_string(&sorted)?;
        self.store.set_item(&notes_key(owner), &encoded)?;
        debug!("event=notes_save module=repo status=ok count={}", sorted.len());
        Ok(sorted)
    }
}
