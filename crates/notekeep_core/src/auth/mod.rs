//! Authentication and session providers.
//!
//! # Responsibility
//! - Define the provider contract shared by local and hosted accounts.
//! - Track the active session and persist its marker.
//!
//! # Invariants
//! - A provider exposes at most one active session.
//! - Failed register/login calls leave the previous session untouched.
//! - Credentials and tokens never appear in log events.

use crate::model::account::{AccountValidationError, Credentials, Session};
use crate::repo::RepoError;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod encoding;
pub mod hosted;
pub mod local;
pub mod rest;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug)]
pub enum AuthError {
    Validation(AccountValidationError),
    AccountExists(String),
    InvalidCredentials,
    /// Hosted sign-up succeeded but the account must be confirmed first.
    ConfirmationRequired(String),
    Repo(RepoError),
    Backend { status: u16, message: String },
    Http(reqwest::Error),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::AccountExists(username) => write!(f, "account already exists: {username}"),
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::ConfirmationRequired(email) => {
                write!(f, "confirm the address {email} before logging in")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::Backend { status, message } => {
                write!(f, "auth backend returned {status}: {message}")
            }
            Self::Http(err) => write!(f, "auth backend unreachable: {err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AccountValidationError> for AuthError {
    fn from(value: AccountValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict(username) => Self::AccountExists(username),
            other => Self::Repo(other),
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(value: StorageError) -> Self {
        Self::Repo(RepoError::Storage(value))
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Contract shared by every account backend.
pub trait AuthProvider {
    /// Re-establishes the session recorded by a previous run, if still valid.
    fn restore_session(&mut self) -> AuthResult<Option<Session>>;
    /// Returns the active session without touching storage.
    fn current_session(&self) -> Option<&Session>;
    /// Creates an account and makes it the active session.
    fn register(&mut self, credentials: &Credentials) -> AuthResult<Session>;
    /// Verifies credentials and makes the account the active session.
    fn login(&mut self, credentials: &Credentials) -> AuthResult<Session>;
    /// Ends the active session. Succeeds when no session is active.
    fn logout(&mut self) -> AuthResult<()>;
}
