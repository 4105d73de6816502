//! JSON encoding of whole collections under fixed storage keys.

use super::{RepoError, RepoResult};
use crate::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Storage slot holding the JSON array of applications.
pub const APPLICATIONS_KEY: &str = "aspire_job_applications";
/// Storage slot holding the JSON array of reminders.
pub const REMINDERS_KEY: &str = "aspire_reminders";

/// Reads and decodes one collection.
///
/// Returns `None` only when the slot has never been written.
pub(crate) fn read_collection<T, S>(store: &S, key: &'static str) -> RepoResult<Option<Vec<T>>>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    let Some(bytes) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|err| RepoError::Corrupt {
            key,
            message: err.to_string(),
        })
}

/// Encodes and writes one collection, replacing the previous value.
pub(crate) fn write_collection<T, S>(store: &mut S, key: &'static str, items: &[T]) -> RepoResult<()>
where
    T: Serialize,
    S: KeyValueStore,
{
    let bytes = serde_json::to_vec(items).map_err(RepoError::Encode)?;
    store.set(key, &bytes)?;
    Ok(())
}
