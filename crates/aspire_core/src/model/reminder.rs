//! Follow-up reminder attached to one application.

use super::application::ApplicationId;
use super::{new_record_id, RecordValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a reminder.
pub type ReminderId = String;

/// Scheduled follow-up note. The caller owns `date` entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: ReminderId,
    pub application_id: ApplicationId,
    pub date: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub is_done: bool,
}

impl Reminder {
    /// Creates an open reminder with a generated id.
    pub fn new(
        application_id: impl Into<ApplicationId>,
        date: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self::with_id(new_record_id(), application_id, date, description)
    }

    /// Creates an open reminder with a caller-provided id.
    pub fn with_id(
        id: impl Into<ReminderId>,
        application_id: impl Into<ApplicationId>,
        date: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            application_id: application_id.into(),
            date,
            description: description.into(),
            is_done: false,
        }
    }

    /// Checks required fields before persistence.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.trim().is_empty() {
            return Err(RecordValidationError::EmptyId);
        }
        if self.application_id.trim().is_empty() {
            return Err(RecordValidationError::EmptyApplicationId);
        }
        if self.description.trim().is_empty() {
            return Err(RecordValidationError::EmptyDescription);
        }
        Ok(())
    }
}
