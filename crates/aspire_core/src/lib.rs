//! Core domain logic for the Aspire job-application tracker.
//! This crate is the single source of truth for tracker data and its
//! derived statistics.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::TrackerConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::application::{Application, ApplicationId, ApplicationStatus};
pub use model::reminder::{Reminder, ReminderId};
pub use model::RecordValidationError;
pub use repo::query::{ApplicationListQuery, ApplicationSort};
pub use repo::tracker_repo::TrackerRepository;
pub use repo::{RepoError, RepoResult, APPLICATIONS_KEY, REMINDERS_KEY};
pub use service::stats_service::{
    application_stats, available_years, compute_application_stats, monthly_activity,
    ApplicationStats, MonthlyActivity, StatusCounts,
};
pub use service::tracker_service::{DashboardSummary, ServiceError, TrackerService};
pub use service::transfer_service::{
    export_bundle, export_file_name, export_json, import_json, ExportBundle, ImportSummary,
    TransferError,
};
pub use storage::{KeyValueStore, MemoryKvStore, SqliteKvStore, StorageError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
