//! Note domain model and input validation.
//!
//! # Invariants
//! - `content` is never blank once persisted.
//! - `title` holds at most [`TITLE_MAX_CHARS`] and `content` at most
//!   [`CONTENT_MAX_CHARS`] characters.
//! - `updated_at >= created_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type NoteId = Uuid;

pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MAX_CHARS: usize = 10_000;
pub const UNTITLED_NOTE: &str = "Untitled Note";

/// One user-owned note as stored in the storage area.
///
/// Serialized in camelCase with RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a note from validated input, stamped at `now`.
    pub fn create(input: ValidNote, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces title and content, bumping `updated_at`.
    pub fn apply_edit(&mut self, input: ValidNote, now: DateTime<Utc>) {
        self.title = input.title;
        self.content = input.content;
        self.updated_at = now.max(self.created_at);
    }

    /// Title for display; blank titles fall back to [`UNTITLED_NOTE`].
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED_NOTE
        } else {
            self.title.as_str()
        }
    }

    /// Single-line preview of the content, cut at `max_chars`.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let flat = self.content.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= max_chars {
            return flat;
        }
        let mut cut = flat.chars().take(max_chars).collect::<String>();
        cut.push('…');
        cut
    }
}

/// Validation failure for note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyContent,
    TitleTooLong { chars: usize, max: usize },
    ContentTooLong { chars: usize, max: usize },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "note content is required"),
            Self::TitleTooLong { chars, max } => {
                write!(f, "title has {chars} characters; at most {max} allowed")
            }
            Self::ContentTooLong { chars, max } => {
                write!(f, "content has {chars} characters; at most {max} allowed")
            }
        }
    }
}

impl Error for NoteValidationError {}

/// Raw title/content as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

/// Trimmed, length-checked note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNote {
    title: String,
    content: String,
}

impl ValidNote {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Checks limits on the raw input and returns trimmed values.
    ///
    /// Blank content is rejected first, then title length, then content length.
    pub fn validate(self) -> Result<ValidNote, NoteValidationError> {
        if self.content.trim().is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }

        let title_chars = self.title.chars().count();
        if title_chars > TITLE_MAX_CHARS {
            return Err(NoteValidationError::TitleTooLong {
                chars: title_chars,
                max: TITLE_MAX_CHARS,
            });
        }

        let content_chars = self.content.chars().count();
        if content_chars > CONTENT_MAX_CHARS {
            return Err(NoteValidationError::ContentTooLong {
                chars: content_chars,
                max: CONTENT_MAX_CHARS,
            });
        }

        Ok(ValidNote {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
        })
    }
}

/// Orders notes by `updated_at` descending, ties broken by id ascending.
pub fn sort_by_recency(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn validate_trims_title_and_content() {
        let valid = NoteDraft::new("  Groceries ", "\n milk, eggs \n")
            .validate()
            .unwrap();
        assert_eq!(valid.title(), "Groceries");
        assert_eq!(valid.content(), "milk, eggs");
    }

    #[test]
    fn validate_rejects_blank_content() {
        let err = NoteDraft::new("title", "   \t\n").validate().unwrap_err();
        assert_eq!(err, NoteValidationError::EmptyContent);
    }

    #[test]
    fn validate_enforces_length_limits_at_boundary() {
        let ok_title = "t".repeat(TITLE_MAX_CHARS);
        let ok_content = "c".repeat(CONTENT_MAX_CHARS);
        assert!(NoteDraft::new(ok_title.clone(), ok_content.clone())
            .validate()
            .is_ok());

        let err = NoteDraft::new(format!("{ok_title}t"), "body")
            .validate()
            .unwrap_err();
        assert!(matches!(err, NoteValidationError::TitleTooLong { chars: 201, .. }));

        let err = NoteDraft::new("", format!("{ok_content}c"))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            NoteValidationError::ContentTooLong { chars: 10_001, .. }
        ));
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(NoteDraft::new(title, "body").validate().is_ok());
    }

    #[test]
    fn display_title_falls_back_for_blank_titles() {
        let note = Note::create(NoteDraft::new("", "body").validate().unwrap(), at(10));
        assert_eq!(note.display_title(), UNTITLED_NOTE);
    }

    #[test]
    fn apply_edit_keeps_created_at_and_bumps_updated_at() {
        let mut note = Note::create(NoteDraft::new("a", "b").validate().unwrap(), at(10));
        note.apply_edit(NoteDraft::new("c", "d").validate().unwrap(), at(20));
        assert_eq!(note.created_at, at(10));
        assert_eq!(note.updated_at, at(20));
        assert_eq!(note.title, "c");
    }

    #[test]
    fn excerpt_flattens_whitespace_and_truncates() {
        let note = Note::create(
            NoteDraft::new("", "line one\n\nline   two").validate().unwrap(),
            at(0),
        );
        assert_eq!(note.excerpt(100), "line one line two");
        assert_eq!(note.excerpt(4), "line…");
    }

    #[test]
    fn sort_by_recency_orders_newest_first() {
        let mut older = Note::create(NoteDraft::new("", "old").validate().unwrap(), at(1));
        older.id = uuid::Uuid::nil();
        let newer = Note::create(NoteDraft::new("", "new").validate().unwrap(), at(2));
        let mut notes = vec![older.clone(), newer.clone()];
        sort_by_recency(&mut notes);
        assert_eq!(notes, vec![newer, older]);
    }

    #[test]
    fn serializes_in_camel_case() {
        let note = Note::create(NoteDraft::new("t", "c").validate().unwrap(), at(0));
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["updatedAt"], "1970-01-01T00:00:00Z");
    }
}
