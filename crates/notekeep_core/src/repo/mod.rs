//! Repository layer over the storage area.
//!
//! # Responsibility
//! - Encode domain records as JSON under the well-known storage keys.
//! - Keep key layout and (de)serialization out of auth and service code.
//!
//! # Invariants
//! - Read paths reject undecodable persisted state instead of masking it.
//! - Note lists are persisted and returned sorted by recency.

use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod note_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Storage(StorageError),
    /// Persisted value under `key` could not be decoded.
    InvalidData { key: String, message: String },
    Serialization(serde_json::Error),
    /// An account with this name already exists.
    Conflict(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid persisted data under `{key}`: {message}")
            }
            Self::Serialization(err) => write!(f, "failed to encode record: {err}"),
            Self::Conflict(username) => write!(f, "account already exists: {username}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData { .. } | Self::Conflict(_) => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
