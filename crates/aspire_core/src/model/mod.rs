//! Tracker domain model.
//!
//! # Responsibility
//! - Define the canonical application/reminder records used by core logic.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - Every record is identified by a stable, opaque string id.
//! - A reminder belongs to exactly one application via `application_id`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod application;
pub mod reminder;

/// Field-level validation failure for tracker records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordValidationError {
    EmptyId,
    EmptyCompanyName,
    EmptyPosition,
    EmptyApplicationId,
    EmptyDescription,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::EmptyId => "record id must not be empty",
            Self::EmptyCompanyName => "application company name must not be empty",
            Self::EmptyPosition => "application position must not be empty",
            Self::EmptyApplicationId => "reminder must reference an application id",
            Self::EmptyDescription => "reminder description must not be empty",
        };
        f.write_str(message)
    }
}

impl Error for RecordValidationError {}

/// Generates a fresh opaque record id.
pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
