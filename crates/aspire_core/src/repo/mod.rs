//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Own the persisted application/reminder collections and all mutations.
//! - Keep JSON encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate records before touching storage.
//! - Every mutation rewrites the whole affected collection.
//! - Deleting an application removes its reminders.
//! - Present-but-unparseable collections surface as `RepoError::Corrupt`,
//!   never as an empty collection.

use crate::model::RecordValidationError;
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod collection;
pub mod query;
pub mod tracker_repo;

pub use collection::{APPLICATIONS_KEY, REMINDERS_KEY};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for tracker persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Storage(StorageError),
    Corrupt { key: &'static str, message: String },
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid record: {err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Corrupt { key, message } => {
                write!(f, "stored collection `{key}` is corrupt: {message}")
            }
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Corrupt { .. } => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
