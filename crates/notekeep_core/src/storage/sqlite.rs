//! SQLite-backed storage area over the `kv_entries` table.

use super::{KeyValueStore, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

const KV_TABLE: &str = "kv_entries";

/// Storage area persisted in a migrated SQLite connection.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`].
    ///
    /// # Errors
    /// - `StorageError::MissingTable` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [KV_TABLE],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(StorageError::MissingTable(KV_TABLE));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKeyValueStore;
    use crate::db::open_db_in_memory;
    use crate::storage::{KeyValueStore, StorageError};
    use rusqlite::Connection;

    #[test]
    fn set_get_remove_cycle() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();

        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "one").unwrap();
        store.set_item("k", "two").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("two"));

        store.remove_item("k").unwrap();
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKeyValueStore::try_new(&conn).err().unwrap();
        assert!(matches!(err, StorageError::MissingTable("kv_entries")));
    }
}
