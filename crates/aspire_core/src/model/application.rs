//! Job application record.
//!
//! # Invariants
//! - `id` is assigned once and never changes.
//! - `tags` keeps insertion order and holds no exact duplicates.
//! - `date_updated >= date_applied` is expected but not enforced.

use super::{new_record_id, RecordValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of an application.
pub type ApplicationId = String;

/// Pipeline stage of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Submitted, no answer yet.
    Applied,
    /// At least one interview scheduled or held.
    Interviewing,
    /// Offer received.
    Offer,
    /// Turned down.
    Rejected,
}

impl ApplicationStatus {
    /// All statuses in pipeline order.
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    /// Stable lowercase label, identical to the persisted form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Interviewing => "interviewing",
            Self::Offer => "offer",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a persisted/label form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "applied" => Some(Self::Applied),
            "interviewing" => Some(Self::Interviewing),
            "offer" => Some(Self::Offer),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Whether the employer has answered in any way.
    pub fn is_response(self) -> bool {
        self != Self::Applied
    }
}

/// One tracked job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub company_name: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub date_applied: DateTime<Utc>,
    /// Overwritten by the repository on every write.
    pub date_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Application {
    /// Creates an `applied` application with a generated id.
    ///
    /// `date_applied` and `date_updated` both start at the current instant.
    pub fn new(company_name: impl Into<String>, position: impl Into<String>) -> Self {
        Self::with_id(new_record_id(), company_name, position)
    }

    /// Creates an application with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: impl Into<ApplicationId>,
        company_name: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            company_name: company_name.into(),
            position: position.into(),
            status: ApplicationStatus::Applied,
            date_applied: now,
            date_updated: now,
            location: None,
            job_description: None,
            salary: None,
            notes: None,
            resume_version: None,
            url: None,
            contact_email: None,
            contact_name: None,
            tags: Vec::new(),
        }
    }

    /// Adds a trimmed tag unless it is empty or already present.
    ///
    /// Matching is exact and case-sensitive. Returns whether the tag was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|existing| existing == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Removes an exact tag match. Returns whether anything was removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    /// Checks required fields before persistence.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.trim().is_empty() {
            return Err(RecordValidationError::EmptyId);
        }
        if self.company_name.trim().is_empty() {
            return Err(RecordValidationError::EmptyCompanyName);
        }
        if self.position.trim().is_empty() {
            return Err(RecordValidationError::EmptyPosition);
        }
        Ok(())
    }

    /// Days between applying and the latest update, fractional.
    pub fn days_since_applied_at_update(&self) -> f64 {
        let millis = (self.date_updated - self.date_applied).num_milliseconds();
        millis as f64 / MILLIS_PER_DAY
    }
}

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Removes exact duplicate and blank tags, keeping first occurrences in order.
pub(crate) fn dedupe_tags(tags: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if tag.trim().is_empty() || result.iter().any(|existing| existing == tag) {
            continue;
        }
        result.push(tag.clone());
    }
    result
}
