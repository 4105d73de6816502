//! Export/import of the full tracker state.
//!
//! # Responsibility
//! - Bundle both collections with an export timestamp.
//! - Replace both collections from a previously exported bundle.
//!
//! # Invariants
//! - Import requires both `applications` and `reminders` keys.
//! - Import does not run record-level validation; records that decode are
//!   written as-is.
//! - Import writes nothing when decoding fails.

use crate::model::application::Application;
use crate::model::reminder::Reminder;
use crate::repo::tracker_repo::TrackerRepository;
use crate::repo::{RepoError, RepoResult};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Serialized state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub applications: Vec<Application>,
    pub reminders: Vec<Reminder>,
    pub export_date: DateTime<Utc>,
}

/// Counts written by a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub applications: usize,
    pub reminders: usize,
}

#[derive(Debug)]
pub enum TransferError {
    /// Input is not a JSON object or a collection does not decode.
    InvalidFormat(String),
    /// A required collection key is absent or null.
    MissingCollection(&'static str),
    Repo(RepoError),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(message) => write!(f, "invalid import data: {message}"),
            Self::MissingCollection(key) => {
                write!(f, "invalid import data: missing `{key}` collection")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidFormat(_) | Self::MissingCollection(_) => None,
        }
    }
}

impl From<RepoError> for TransferError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Snapshots both collections.
pub fn export_bundle<S: KeyValueStore>(
    repo: &TrackerRepository<S>,
    now: DateTime<Utc>,
) -> RepoResult<ExportBundle> {
    Ok(ExportBundle {
        applications: repo.list_applications()?,
        reminders: repo.list_reminders()?,
        export_date: now,
    })
}

/// Snapshots both collections as pretty-printed JSON.
pub fn export_json<S: KeyValueStore>(
    repo: &TrackerRepository<S>,
    now: DateTime<Utc>,
) -> Result<String, TransferError> {
    let bundle = export_bundle(repo, now)?;
    let json = serde_json::to_string_pretty(&bundle)
        .map_err(|err| TransferError::Repo(RepoError::Encode(err)))?;
    info!(
        "event=data_export module=transfer status=ok applications={} reminders={} bytes={}",
        bundle.applications.len(),
        bundle.reminders.len(),
        json.len()
    );
    Ok(json)
}

/// Suggested download name, e.g. `aspire-data-export-2024-05-01.json`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("aspire-data-export-{}.json", now.format("%Y-%m-%d"))
}

/// Replaces both collections with the contents of an exported bundle.
pub fn import_json<S: KeyValueStore>(
    repo: &mut TrackerRepository<S>,
    text: &str,
) -> Result<ImportSummary, TransferError> {
    let (applications, reminders) = decode_bundle(text).inspect_err(|err| {
        warn!("event=data_import module=transfer status=error error={err}");
    })?;

    repo.replace_all(&applications, &reminders)?;

    let summary = ImportSummary {
        applications: applications.len(),
        reminders: reminders.len(),
    };
    info!(
        "event=data_import module=transfer status=ok applications={} reminders={}",
        summary.applications, summary.reminders
    );
    Ok(summary)
}

fn decode_bundle(text: &str) -> Result<(Vec<Application>, Vec<Reminder>), TransferError> {
    let mut root: Value =
        serde_json::from_str(text).map_err(|err| TransferError::InvalidFormat(err.to_string()))?;
    let Some(object) = root.as_object_mut() else {
        return Err(TransferError::InvalidFormat(
            "top-level value must be an object".to_string(),
        ));
    };

    let applications = take_collection(object, "applications")?;
    let reminders = take_collection(object, "reminders")?;
    Ok((applications, reminders))
}

fn take_collection<T: serde::de::DeserializeOwned>(
    object: &mut serde_json::Map<String, Value>,
    key: &'static str,
) -> Result<Vec<T>, TransferError> {
    match object.remove(key) {
        None | Some(Value::Null) => Err(TransferError::MissingCollection(key)),
        Some(value) => serde_json::from_value(value)
            .map_err(|err| TransferError::InvalidFormat(format!("`{key}`: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_bundle, export_file_name, TransferError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn file_name_uses_export_day() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 18, 45, 0).unwrap();
        assert_eq!(export_file_name(now), "aspire-data-export-2024-05-01.json");
    }

    #[test]
    fn decode_rejects_missing_and_null_collections() {
        let err = decode_bundle(r#"{"applications": []}"#).unwrap_err();
        assert!(matches!(err, TransferError::MissingCollection("reminders")));

        let err = decode_bundle(r#"{"applications": null, "reminders": []}"#).unwrap_err();
        assert!(matches!(err, TransferError::MissingCollection("applications")));
    }

    #[test]
    fn decode_rejects_non_object_input() {
        assert!(matches!(
            decode_bundle("[]").unwrap_err(),
            TransferError::InvalidFormat(_)
        ));
        assert!(matches!(
            decode_bundle("not json").unwrap_err(),
            TransferError::InvalidFormat(_)
        ));
    }

    #[test]
    fn decode_accepts_empty_collections_without_export_date() {
        let (applications, reminders) =
            decode_bundle(r#"{"applications": [], "reminders": []}"#).unwrap();
        assert!(applications.is_empty());
        assert!(reminders.is_empty());
    }
}
