//! Local account records and the active-user marker.
//!
//! # Invariants
//! - All accounts live in one JSON object under `notesUsers`,
//!   mapping username to encoded password.
//! - The active-user marker is a bare username under `notesCurrentUser`.

use crate::repo::{RepoError, RepoResult};
use crate::storage::{KeyValueStore, CURRENT_USER_KEY, USERS_KEY};
use std::collections::BTreeMap;

/// Repository interface for locally stored accounts.
pub trait AccountRepository {
    fn account_exists(&self, username: &str) -> RepoResult<bool>;
    /// Returns the stored password encoding for `username`.
    fn encoded_password(&self, username: &str) -> RepoResult<Option<String>>;
    /// Adds an account. Existing names yield `RepoError::Conflict`.
    fn insert_account(&self, username: &str, encoded_password: &str) -> RepoResult<()>;
    fn current_user(&self) -> RepoResult<Option<String>>;
    fn set_current_user(&self, username: &str) -> RepoResult<()>;
    fn clear_current_user(&self) -> RepoResult<()>;
}

/// Account repository backed by any storage area.
pub struct StorageAccountRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> StorageAccountRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load_accounts(&self) -> RepoResult<BTreeMap<String, String>> {
        match self.store.get_item(USERS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|err| RepoError::InvalidData {
                key: USERS_KEY.to_string(),
                message: err.to_string(),
            }),
            None => Ok(BTreeMap::new()),
        }
    }
}

impl<S: KeyValueStore> AccountRepository for StorageAccountRepository<S> {
    fn account_exists(&self, username: &str) -> RepoResult<bool> {
        Ok(self.load_accounts()?.contains_key(username))
    }

    fn encoded_password(&self, username: &str) -> RepoResult<Option<String>> {
        Ok(self.load_accounts()?.remove(username))
    }

    fn insert_account(&self, username: &str, encoded_password: &str) -> RepoResult<()> {
        let mut accounts = self.load_accounts()?;
        if accounts.contains_key(username) {
            return Err(RepoError::Conflict(username.to_string()));
        }
        accounts.insert(username.to_string(), encoded_password.to_string());
        self.store
            .set_item(USERS_KEY, &serde_json::to_string(&accounts)?)?;
        Ok(())
    }

    fn current_user(&self) -> RepoResult<Option<String>> {
        Ok(self
            .store
            .get_item(CURRENT_USER_KEY)?
            .filter(|value| !value.is_empty()))
    }

    fn set_current_user(&self, username: &str) -> RepoResult<()> {
        self.store.set_item(CURRENT_USER_KEY, username)?;
        Ok(())
    }

    fn clear_current_user(&self) -> RepoResult<()> {
        self.store.remove_item(CURRENT_USER_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AccountRepository, StorageAccountRepository};
    use crate::repo::RepoError;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore, USERS_KEY};

    #[test]
    fn insert_rejects_duplicate_names() {
        let store = MemoryKeyValueStore::new();
        let repo = StorageAccountRepository::new(&store);
        repo.insert_account("alice", "c2VjcmV0").unwrap();

        let err = repo.insert_account("alice", "b3RoZXI=").unwrap_err();
        assert!(matches!(err, RepoError::Conflict(name) if name == "alice"));
        assert_eq!(
            repo.encoded_password("alice").unwrap().as_deref(),
            Some("c2VjcmV0")
        );
    }

    #[test]
    fn accounts_are_stored_as_one_json_object() {
        let store = MemoryKeyValueStore::new();
        let repo = StorageAccountRepository::new(&store);
        repo.insert_account("alice", "YQ==").unwrap();
        repo.insert_account("bob", "Yg==").unwrap();

        let raw = store.get_item(USERS_KEY).unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["alice"], "YQ==");
        assert_eq!(parsed["bob"], "Yg==");
    }

    #[test]
    fn empty_marker_counts_as_no_user() {
        let store = MemoryKeyValueStore::new();
        let repo = StorageAccountRepository::new(&store);
        repo.set_current_user("").unwrap();
        assert_eq!(repo.current_user().unwrap(), None);

        repo.set_current_user("alice").unwrap();
        assert_eq!(repo.current_user().unwrap().as_deref(), Some("alice"));
        repo.clear_current_user().unwrap();
        assert_eq!(repo.current_user().unwrap(), None);
    }

    #[test]
    fn corrupt_account_table_is_reported() {
        let store = MemoryKeyValueStore::new();
        store.set_item(USERS_KEY, "not json").unwrap();
        let repo = StorageAccountRepository::new(&store);
        assert!(matches!(
            repo.account_exists("alice"),
            Err(RepoError::InvalidData { .. })
        ));
    }
}
