//! Process-local storage area.

use super::{KeyValueStore, StorageResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory storage area; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
