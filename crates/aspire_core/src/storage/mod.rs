//! Key-value persistence seam for tracker collections.
//!
//! # Responsibility
//! - Define the minimal `get`/`set` contract the repository writes through.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - `set` replaces the whole value stored under a key.
//! - `get` reflects the last completed `set` for that key.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by a key-value store or while preparing its backend.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; opening it would risk data loss.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// The connection was handed over before migrations ran.
    SchemaNotReady { version: u32, expected: u32 },
    /// Backend-specific failure outside SQLite.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "tracker database schema {db_version} is newer than supported {latest_supported}"
            ),
            Self::SchemaNotReady { version, expected } => write!(
                f,
                "storage schema version {version} does not match expected {expected}"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::SchemaNotReady { .. }
            | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Byte-oriented key-value store used as the repository backing medium.
pub trait KeyValueStore {
    /// Returns the stored bytes, or `None` when the slot was never written.
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;
    /// Replaces the bytes stored under `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> StorageResult<()>;
}
