//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/update/delete/get/list for the active user's notes.
//! - Apply note input rules before anything is persisted.
//!
//! # Invariants
//! - Every write persists the owner's full list, sorted by recency.
//! - `update_note` keeps `created_at` and bumps `updated_at`.
//! - `delete_note` removes exactly one id and leaves the rest untouched.

use crate::model::account::Session;
use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::note_repo::NoteRepository;
use crate::repo::RepoError;
use chrono::Utc;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    Validation(NoteValidationError),
    NoteNotFound(NoteId),
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NoteNotFound(_) => None,
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Note service bound to one session's note list.
pub struct NoteService<R: NoteRepository> {
    repo: R,
    owner: String,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R, session: &Session) -> Self {
        Self {
            repo,
            owner: session.storage_owner().to_string(),
        }
    }

    /// Lists the owner's notes, newest first.
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.repo.load_notes(&self.owner)?)
    }

    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        Ok(self
            .repo
            .load_notes(&self.owner)?
            .into_iter()
            .find(|note| note.id == id))
    }

    /// Validates input and appends a new note.
    pub fn create_note(&self, title: &str, content: &str) -> Result<Note, NoteServiceError> {
        let input = NoteDraft::new(title, content).validate()?;
        let note = Note::create(input, Utc::now());

        let mut notes = self.repo.load_notes(&self.owner)?;
        notes.push(note.clone());
        self.repo.save_notes(&self.owner, &notes)?;

        info!("event=note_create module=service status=ok count={}", notes.len());
        Ok(note)
    }

    /// Replaces title and content of an existing note.
    pub fn update_note(
        &self,
        id: NoteId,
        title: &str,
        content: &str,
    ) -> Result<Note, NoteServiceError> {
        let input = NoteDraft::new(title, content).validate()?;

        let mut notes = self.repo.load_notes(&self.owner)?;
        let target = notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        target.apply_edit(input, Utc::now());
        let updated = target.clone();
        self.repo.save_notes(&self.owner, &notes)?;

        info!("event=note_update module=service status=ok");
        Ok(updated)
    }

    /// Removes the note with `id`.
    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        let notes = self.repo.load_notes(&self.owner)?;
        let before = notes.len();
        let remaining: Vec<Note> = notes.into_iter().filter(|note| note.id != id).collect();
        if remaining.len() == before {
            return Err(NoteServiceError::NoteNotFound(id));
        }
        self.repo.save_notes(&self.owner, &remaining)?;

        info!(
            "event=note_delete module=service status=ok count={}",
            remaining.len()
        );
        Ok(())
    }
}
