//! Core domain logic for notekeep.
//! Accounts, sessions and per-user notes over a key/value storage area.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use auth::hosted::{HostedAuthProvider, HostedSession, HostedUser, IdentityBackend, UserDirectory};
pub use auth::local::LocalAuthProvider;
pub use auth::rest::RestIdentityBackend;
pub use auth::{AuthError, AuthProvider, AuthResult};
pub use config::{AppConfig, AuthBackendKind, ConfigError, HostedAuthConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::account::{AccountValidationError, Credentials, Session};
pub use model::note::{Note, NoteDraft, NoteId, NoteValidationError};
pub use repo::account_repo::{AccountRepository, StorageAccountRepository};
pub use repo::note_repo::{NoteRepository, StorageNoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::note_service::{NoteService, NoteServiceError};
pub use storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
