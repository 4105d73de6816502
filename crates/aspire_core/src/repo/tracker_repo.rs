//! Application/reminder repository over a key-value store.
//!
//! # Responsibility
//! - Provide upsert/list/delete APIs for both collections.
//! - Cascade application deletes to dependent reminders.
//!
//! # Invariants
//! - Collections keep storage order; reads never sort implicitly.
//! - Upserts replace in place and append only unknown ids.
//! - `date_updated` is stamped by the repository on every application write.
//! - Missing ids are reported as `None`, never as errors.

use super::collection::{read_collection, write_collection, APPLICATIONS_KEY, REMINDERS_KEY};
use super::query::ApplicationListQuery;
use super::RepoResult;
use crate::model::application::{dedupe_tags, Application, ApplicationStatus};
use crate::model::reminder::Reminder;
use crate::storage::KeyValueStore;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Single source of truth for applications and reminders.
pub struct TrackerRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TrackerRepository<S> {
    /// Opens the repository, creating empty collections on first run.
    ///
    /// # Errors
    /// - `RepoError::Corrupt` when a collection exists but cannot be decoded.
    /// - `RepoError::Storage` on backend failures.
    pub fn open(store: S) -> RepoResult<Self> {
        let mut repo = Self { store };
        let applications = repo.ensure_collection::<Application>(APPLICATIONS_KEY)?;
        let reminders = repo.ensure_collection::<Reminder>(REMINDERS_KEY)?;
        info!(
            "event=repo_open module=repo status=ok applications={} reminders={}",
            applications, reminders
        );
        Ok(repo)
    }

    /// Gives back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn list_applications(&self) -> RepoResult<Vec<Application>> {
        Ok(read_collection(&self.store, APPLICATIONS_KEY)?.unwrap_or_default())
    }

    pub fn get_application(&self, id: &str) -> RepoResult<Option<Application>> {
        Ok(self
            .list_applications()?
            .into_iter()
            .find(|app| app.id == id))
    }

    /// Inserts or replaces an application by id.
    ///
    /// Returns the record as stored, including the stamped `date_updated`.
    pub fn save_application(&mut self, application: Application) -> RepoResult<Application> {
        application.validate()?;

        let mut stored = application;
        stored.tags = dedupe_tags(&stored.tags);
        stored.date_updated = Utc::now();

        let mut applications = self.list_applications()?;
        let mode = match applications.iter().position(|app| app.id == stored.id) {
            Some(index) => {
                applications[index] = stored.clone();
                "update"
            }
            None => {
                applications.push(stored.clone());
                "insert"
            }
        };
        self.write(APPLICATIONS_KEY, &applications)?;

        info!(
            "event=application_save module=repo status=ok mode={} total={}",
            mode,
            applications.len()
        );
        Ok(stored)
    }

    /// Deletes an application and every reminder that references it.
    ///
    /// Unknown ids are a no-op.
    ///
    /// Reminders are rewritten before applications. If the second write
    /// fails, the application survives with no reminders instead of
    /// leaving reminders that point at nothing.
    pub fn delete_application(&mut self, id: &str) -> RepoResult<()> {
        let mut applications = self.list_applications()?;
        let mut reminders = self.list_reminders()?;
        let before = applications.len();
        let reminders_before = reminders.len();
        applications.retain(|app| app.id != id);
        reminders.retain(|reminder| reminder.application_id != id);

        if let Err(err) = self.write(REMINDERS_KEY, &reminders) {
            error!("event=application_delete module=repo status=error stage=reminders");
            return Err(err);
        }
        if let Err(err) = self.write(APPLICATIONS_KEY, &applications) {
            error!("event=application_delete module=repo status=error stage=applications");
            return Err(err);
        }

        info!(
            "event=application_delete module=repo status=ok removed={} reminders_removed={}",
            before - applications.len(),
            reminders_before - reminders.len()
        );
        Ok(())
    }

    /// Changes only `status` (and `date_updated`) of an existing application.
    pub fn update_application_status(
        &mut self,
        id: &str,
        status: ApplicationStatus,
    ) -> RepoResult<Option<Application>> {
        let mut applications = self.list_applications()?;
        let Some(app) = applications.iter_mut().find(|app| app.id == id) else {
            info!("event=application_status module=repo status=not_found");
            return Ok(None);
        };

        app.status = status;
        app.date_updated = Utc::now();
        let updated = app.clone();
        self.write(APPLICATIONS_KEY, &applications)?;

        info!(
            "event=application_status module=repo status=ok new_status={}",
            status.as_str()
        );
        Ok(Some(updated))
    }

    /// Lists applications matching `query`.
    pub fn query_applications(&self, query: &ApplicationListQuery) -> RepoResult<Vec<Application>> {
        Ok(query.apply(self.list_applications()?))
    }

    /// Applications whose `date_applied` falls on `date` (UTC).
    pub fn applications_on(&self, date: NaiveDate) -> RepoResult<Vec<Application>> {
        let mut applications = self.list_applications()?;
        applications.retain(|app| app.date_applied.date_naive() == date);
        Ok(applications)
    }

    pub fn list_reminders(&self) -> RepoResult<Vec<Reminder>> {
        Ok(read_collection(&self.store, REMINDERS_KEY)?.unwrap_or_default())
    }

    /// Reminders for one application, in storage order.
    pub fn list_reminders_for(&self, application_id: &str) -> RepoResult<Vec<Reminder>> {
        let mut reminders = self.list_reminders()?;
        reminders.retain(|reminder| reminder.application_id == application_id);
        Ok(reminders)
    }

    /// Inserts or replaces a reminder by id. No field is rewritten.
    ///
    /// The parent application is not checked here.
    pub fn save_reminder(&mut self, reminder: Reminder) -> RepoResult<Reminder> {
        reminder.validate()?;

        let mut reminders = self.list_reminders()?;
        let mode = match reminders.iter().position(|r| r.id == reminder.id) {
            Some(index) => {
                reminders[index] = reminder.clone();
                "update"
            }
            None => {
                reminders.push(reminder.clone());
                "insert"
            }
        };
        self.write(REMINDERS_KEY, &reminders)?;

        info!(
            "event=reminder_save module=repo status=ok mode={} total={}",
            mode,
            reminders.len()
        );
        Ok(reminder)
    }

    /// Deletes a reminder. Unknown ids are a no-op.
    pub fn delete_reminder(&mut self, id: &str) -> RepoResult<()> {
        let mut reminders = self.list_reminders()?;
        let before = reminders.len();
        reminders.retain(|reminder| reminder.id != id);
        self.write(REMINDERS_KEY, &reminders)?;

        info!(
            "event=reminder_delete module=repo status=ok removed={}",
            before - reminders.len()
        );
        Ok(())
    }

    /// Flips `is_done` of an existing reminder.
    pub fn toggle_reminder_done(&mut self, id: &str) -> RepoResult<Option<Reminder>> {
        let mut reminders = self.list_reminders()?;
        let Some(reminder) = reminders.iter_mut().find(|r| r.id == id) else {
            info!("event=reminder_toggle module=repo status=not_found");
            return Ok(None);
        };

        reminder.is_done = !reminder.is_done;
        let toggled = reminder.clone();
        self.write(REMINDERS_KEY, &reminders)?;

        info!(
            "event=reminder_toggle module=repo status=ok is_done={}",
            toggled.is_done
        );
        Ok(Some(toggled))
    }

    /// Open reminders due from the start of `now`'s UTC day onward, soonest first.
    pub fn upcoming_reminders(&self, now: DateTime<Utc>, limit: usize) -> RepoResult<Vec<Reminder>> {
        let start_of_day = now.date_naive().and_time(NaiveTime::MIN).and_utc();

        let mut upcoming: Vec<Reminder> = self
            .list_reminders()?
            .into_iter()
            .filter(|reminder| !reminder.is_done && reminder.date >= start_of_day)
            .collect();
        upcoming.sort_by_key(|reminder| reminder.date);
        upcoming.truncate(limit);
        Ok(upcoming)
    }

    /// Reminders due on `date` (UTC), in storage order.
    pub fn reminders_due_on(&self, date: NaiveDate) -> RepoResult<Vec<Reminder>> {
        let mut reminders = self.list_reminders()?;
        reminders.retain(|reminder| reminder.date.date_naive() == date);
        Ok(reminders)
    }

    /// Replaces both collections wholesale without per-record validation.
    pub fn replace_all(
        &mut self,
        applications: &[Application],
        reminders: &[Reminder],
    ) -> RepoResult<()> {
        self.write(APPLICATIONS_KEY, applications)?;
        self.write(REMINDERS_KEY, reminders)?;
        info!(
            "event=repo_replace_all module=repo status=ok applications={} reminders={}",
            applications.len(),
            reminders.len()
        );
        Ok(())
    }

    /// Removes every application and reminder.
    pub fn clear_all(&mut self) -> RepoResult<()> {
        self.replace_all(&[], &[])
    }

    fn ensure_collection<T>(&mut self, key: &'static str) -> RepoResult<usize>
    where
        T: DeserializeOwned + Serialize,
    {
        match read_collection::<T, S>(&self.store, key) {
            Ok(Some(items)) => Ok(items.len()),
            Ok(None) => {
                self.write::<T>(key, &[])?;
                info!("event=repo_init module=repo status=ok key={key} created=true");
                Ok(0)
            }
            Err(err) => {
                error!(
                    "event=repo_open module=repo status=error key={} error_code=collection_corrupt",
                    key
                );
                Err(err)
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &'static str, items: &[T]) -> RepoResult<()> {
        write_collection(&mut self.store, key, items)
    }
}
