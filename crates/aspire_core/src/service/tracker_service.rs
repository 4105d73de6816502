//! Tracker use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for form, list, board and dashboard callers.
//! - Delegate persistence to `TrackerRepository`.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Reminders created here always reference an existing application.

use crate::model::application::{Application, ApplicationStatus};
use crate::model::new_record_id;
use crate::model::reminder::Reminder;
use crate::repo::query::ApplicationListQuery;
use crate::repo::tracker_repo::TrackerRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::stats_service::{compute_application_stats, ApplicationStats};
use crate::service::transfer_service::{export_json, import_json, ImportSummary, TransferError};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const DASHBOARD_RECENT_LIMIT: usize = 5;
const DASHBOARD_UPCOMING_LIMIT: usize = 3;

#[derive(Debug)]
pub enum ServiceError {
    ApplicationNotFound(String),
    /// `create_application_with` was handed an id that is already stored.
    DuplicateApplication(String),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApplicationNotFound(id) => write!(f, "application not found: {id}"),
            Self::DuplicateApplication(id) => write!(f, "application already exists: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ApplicationNotFound(_) | Self::DuplicateApplication(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Data shown on the landing dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: ApplicationStats,
    /// Latest `date_applied` first.
    pub recent_applications: Vec<Application>,
    /// Open reminders from today on, soonest first.
    pub upcoming_reminders: Vec<Reminder>,
}

/// Use-case wrapper around the tracker repository.
pub struct TrackerService<S: KeyValueStore> {
    repo: TrackerRepository<S>,
}

impl<S: KeyValueStore> TrackerService<S> {
    pub fn new(repo: TrackerRepository<S>) -> Self {
        Self { repo }
    }

    /// Opens the repository over `store` and wraps it.
    pub fn open(store: S) -> RepoResult<Self> {
        Ok(Self::new(TrackerRepository::open(store)?))
    }

    pub fn repo(&self) -> &TrackerRepository<S> {
        &self.repo
    }

    pub fn repo_mut(&mut self) -> &mut TrackerRepository<S> {
        &mut self.repo
    }

    /// Creates an `applied` application dated now.
    pub fn create_application(
        &mut self,
        company_name: impl Into<String>,
        position: impl Into<String>,
    ) -> RepoResult<Application> {
        self.repo
            .save_application(Application::new(company_name, position))
    }

    /// Inserts a record built by a form, keeping its status, dates and details.
    ///
    /// A blank id is replaced with a fresh one. An id that already exists is
    /// refused so a create never silently overwrites an edit.
    pub fn create_application_with(
        &mut self,
        mut application: Application,
    ) -> Result<Application, ServiceError> {
        if application.id.trim().is_empty() {
            application.id = new_record_id();
        } else if self.repo.get_application(&application.id)?.is_some() {
            return Err(ServiceError::DuplicateApplication(application.id));
        }
        Ok(self.repo.save_application(application)?)
    }

    /// Persists a fully populated application (insert or update).
    pub fn save_application(&mut self, application: Application) -> RepoResult<Application> {
        self.repo.save_application(application)
    }

    /// Moves an application to another pipeline column.
    pub fn move_application(
        &mut self,
        id: &str,
        status: ApplicationStatus,
    ) -> RepoResult<Option<Application>> {
        self.repo.update_application_status(id, status)
    }

    pub fn delete_application(&mut self, id: &str) -> RepoResult<()> {
        self.repo.delete_application(id)
    }

    pub fn list_applications(&self, query: &ApplicationListQuery) -> RepoResult<Vec<Application>> {
        self.repo.query_applications(query)
    }

    /// Applications grouped by status, pipeline order, storage order inside.
    pub fn board(&self) -> RepoResult<Vec<(ApplicationStatus, Vec<Application>)>> {
        let applications = self.repo.list_applications()?;
        Ok(ApplicationStatus::ALL
            .iter()
            .map(|status| {
                let column = applications
                    .iter()
                    .filter(|app| app.status == *status)
                    .cloned()
                    .collect();
                (*status, column)
            })
            .collect())
    }

    /// Creates a reminder for an existing application.
    pub fn schedule_reminder(
        &mut self,
        application_id: &str,
        date: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Result<Reminder, ServiceError> {
        if self.repo.get_application(application_id)?.is_none() {
            return Err(ServiceError::ApplicationNotFound(application_id.to_string()));
        }
        let reminder = Reminder::new(application_id, date, description);
        Ok(self.repo.save_reminder(reminder)?)
    }

    pub fn toggle_reminder(&mut self, id: &str) -> RepoResult<Option<Reminder>> {
        self.repo.toggle_reminder_done(id)
    }

    pub fn stats(&self) -> RepoResult<ApplicationStats> {
        Ok(compute_application_stats(&self.repo.list_applications()?))
    }

    /// Collects stats, recent applications and upcoming reminders.
    pub fn dashboard(&self, now: DateTime<Utc>) -> RepoResult<DashboardSummary> {
        let applications = self.repo.list_applications()?;
        let stats = compute_application_stats(&applications);
        let recent_applications = ApplicationListQuery {
            limit: Some(DASHBOARD_RECENT_LIMIT),
            ..ApplicationListQuery::default()
        }
        .apply(applications);

        Ok(DashboardSummary {
            stats,
            recent_applications,
            upcoming_reminders: self
                .repo
                .upcoming_reminders(now, DASHBOARD_UPCOMING_LIMIT)?,
        })
    }

    pub fn export(&self, now: DateTime<Utc>) -> Result<String, TransferError> {
        export_json(&self.repo, now)
    }

    pub fn import(&mut self, text: &str) -> Result<ImportSummary, TransferError> {
        import_json(&mut self.repo, text)
    }

    pub fn clear_all(&mut self) -> RepoResult<()> {
        self.repo.clear_all()
    }
}
