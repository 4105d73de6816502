//! SQLite backing file for the tracker key-value store.
//!
//! # Responsibility
//! - Open file or in-memory connections ready for `SqliteKvStore`.
//! - Keep the `kv_entries` schema current.
//!
//! Failures surface as `StorageError`, the same type the store itself
//! returns, so callers handle one error story from open to write.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
