//! Schema steps for the `kv_entries` table.
//!
//! # Invariants
//! - Step versions are strictly increasing; the applied version lives in
//!   `PRAGMA user_version`.
//! - All pending steps commit together or not at all.
//! - A file stamped with a newer version than this build knows is refused.

use crate::storage::{StorageError, StorageResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "kv_entries",
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Applied and known schema versions of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    pub current: u32,
    pub latest: u32,
}

impl SchemaStatus {
    pub fn is_current(&self) -> bool {
        self.current == self.latest
    }
}

/// Latest schema version this build can write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the applied schema version without changing anything.
pub fn schema_status(conn: &Connection) -> StorageResult<SchemaStatus> {
    let current = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(SchemaStatus {
        current,
        latest: latest_version(),
    })
}

/// Brings the connection up to `latest_version()`.
pub fn apply_migrations(conn: &mut Connection) -> StorageResult<SchemaStatus> {
    let status = schema_status(conn)?;
    if status.current > status.latest {
        return Err(StorageError::UnsupportedSchemaVersion {
            db_version: status.current,
            latest_supported: status.latest,
        });
    }
    if status.is_current() {
        return Ok(status);
    }

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > status.current) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok step={} version={}",
            step.name, step.version
        );
    }
    tx.commit()?;

    schema_status(conn)
}
