//! SQLite-backed key-value store.
//!
//! # Invariants
//! - Constructed only over connections opened through `db::open_db*`.
//! - Each `set` is a single upsert statement.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::db::migrations::schema_status;
use rusqlite::{params, Connection, OptionalExtension};

/// Key-value store persisted in the `kv_entries` table.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - Returns `SchemaNotReady` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let status = schema_status(conn)?;
        if !status.is_current() {
            return Err(StorageError::SchemaNotReady {
                version: status.current,
                expected: status.latest,
            });
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKvStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
