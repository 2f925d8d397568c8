//! Key/value storage area.
//!
//! # Responsibility
//! - Provide the string-keyed `get/set/remove` surface that auth and notes
//!   persistence are written against.
//! - Own the well-known key names shared by every backend.
//!
//! # Invariants
//! - Values are opaque strings; callers own their encoding (JSON).
//! - `remove_item` on a missing key is a no-op.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

/// JSON object mapping username to encoded password.
pub const USERS_KEY: &str = "notesUsers";
/// Username of the active local session.
pub const CURRENT_USER_KEY: &str = "notesCurrentUser";
/// JSON-encoded hosted backend session.
pub const HOSTED_SESSION_KEY: &str = "notesHostedSession";

/// Returns the key holding the note list owned by `owner`.
pub fn notes_key(owner: &str) -> String {
    format!("notes_{owner}")
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    MissingTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingTable(table) => write!(f, "required table missing: {table}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingTable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key/value store with local-storage semantics.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Inserts or replaces the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Deletes `key`. Missing keys are ignored.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

#[cfg(test)]
mod tests {
    use super::notes_key;

    #[test]
    fn notes_key_is_scoped_per_owner() {
        assert_eq!(notes_key("alice"), "notes_alice");
        assert_ne!(notes_key("alice"), notes_key("bob"));
    }
}
