use aspire_core::storage::StorageResult;
use aspire_core::{
    Application, KeyValueStore, MemoryKvStore, RecordValidationError, Reminder, RepoError,
    ServiceError, StorageError, TrackerRepository, TrackerService, APPLICATIONS_KEY,
    REMINDERS_KEY,
};
use chrono::{Duration, TimeZone, Utc};

/// Memory store whose writes to one key can be made to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryKvStore,
    failing_key: Option<&'static str>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> StorageResult<()> {
        if self.failing_key == Some(key) {
            return Err(StorageError::Unavailable(format!("write to {key} refused")));
        }
        self.inner.set(key, value)
    }
}

fn flaky_repo_with_reminder() -> TrackerRepository<FlakyStore> {
    let mut repo = TrackerRepository::open(FlakyStore::default()).unwrap();
    repo.save_application(Application::with_id("a1", "Acme", "Engineer"))
        .unwrap();
    repo.save_reminder(Reminder::with_id("r1", "a1", Utc::now(), "Follow up"))
        .unwrap();
    repo
}

fn repo_with_applications(ids: &[&str]) -> TrackerRepository<MemoryKvStore> {
    let mut repo = TrackerRepository::open(MemoryKvStore::new()).unwrap();
    for id in ids {
        repo.save_application(Application::with_id(*id, "Acme", "Engineer"))
            .unwrap();
    }
    repo
}

#[test]
fn reminders_are_listed_per_application_in_storage_order() {
    let mut repo = repo_with_applications(&["a1", "a2"]);
    let due = Utc::now() + Duration::days(1);

    let first = repo
        .save_reminder(Reminder::new("a1", due, "Follow up"))
        .unwrap();
    repo.save_reminder(Reminder::new("a2", due, "Prepare portfolio"))
        .unwrap();
    let third = repo
        .save_reminder(Reminder::new("a1", due - Duration::hours(5), "Send notes"))
        .unwrap();

    let for_a1 = repo.list_reminders_for("a1").unwrap();
    let ids: Vec<&str> = for_a1.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![first.id.as_str(), third.id.as_str()]);
    assert_eq!(repo.list_reminders().unwrap().len(), 3);
}

#[test]
fn save_reminder_replaces_in_place_without_touching_date() {
    let mut repo = repo_with_applications(&["a1"]);
    let due = Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).unwrap();
    let first = repo
        .save_reminder(Reminder::with_id("r1", "a1", due, "Call recruiter"))
        .unwrap();
    repo.save_reminder(Reminder::with_id("r2", "a1", due, "Check portal"))
        .unwrap();

    let mut edited = first.clone();
    edited.description = "Call recruiter again".to_string();
    let returned = repo.save_reminder(edited.clone()).unwrap();
    assert_eq!(returned, edited);

    let reminders = repo.list_reminders().unwrap();
    assert_eq!(reminders.len(), 2);
    assert_eq!(reminders[0], edited);
    assert_eq!(reminders[0].date, due);
}

#[test]
fn deleting_application_cascades_to_its_reminders_only() {
    let mut repo = repo_with_applications(&["a1", "a2"]);
    let due = Utc::now();
    for description in ["one", "two", "three"] {
        repo.save_reminder(Reminder::new("a1", due, description))
            .unwrap();
    }
    let kept = repo
        .save_reminder(Reminder::new("a2", due, "unrelated"))
        .unwrap();

    repo.delete_application("a1").unwrap();

    assert!(repo.get_application("a1").unwrap().is_none());
    assert!(repo.list_reminders_for("a1").unwrap().is_empty());
    assert_eq!(repo.list_reminders().unwrap(), vec![kept]);
    assert!(repo.get_application("a2").unwrap().is_some());
}

#[test]
fn failed_reminder_write_keeps_application_and_reminders() {
    let mut store = flaky_repo_with_reminder().into_store();
    store.failing_key = Some(REMINDERS_KEY);
    let mut repo = TrackerRepository::open(store).unwrap();

    let err = repo.delete_application("a1").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Storage(StorageError::Unavailable(_))
    ));
    assert!(repo.get_application("a1").unwrap().is_some());
    assert_eq!(repo.list_reminders_for("a1").unwrap().len(), 1);
}

#[test]
fn failed_application_write_never_orphans_reminders() {
    let mut store = flaky_repo_with_reminder().into_store();
    store.failing_key = Some(APPLICATIONS_KEY);
    let mut repo = TrackerRepository::open(store).unwrap();

    assert!(repo.delete_application("a1").is_err());

    let applications = repo.list_applications().unwrap();
    for reminder in repo.list_reminders().unwrap() {
        assert!(applications.iter().any(|app| app.id == reminder.application_id));
    }
    assert!(repo.get_application("a1").unwrap().is_some());
    assert!(repo.list_reminders_for("a1").unwrap().is_empty());
}

#[test]
fn toggling_one_reminder_leaves_the_other_unchanged() {
    let mut repo = repo_with_applications(&["a1"]);
    let due = Utc::now() + Duration::days(2);
    let first = repo
        .save_reminder(Reminder::new("a1", due, "Follow up"))
        .unwrap();
    let second = repo
        .save_reminder(Reminder::new("a1", due, "Thank-you email"))
        .unwrap();

    let toggled = repo.toggle_reminder_done(&first.id).unwrap().unwrap();
    assert!(toggled.is_done);

    let reminders = repo.list_reminders_for("a1").unwrap();
    assert_eq!(reminders.iter().filter(|r| r.is_done).count(), 1);
    assert_eq!(reminders.iter().filter(|r| !r.is_done).count(), 1);
    assert_eq!(reminders[0].description, first.description);
    assert_eq!(reminders[0].date, first.date);
    assert_eq!(reminders[1], second);

    let toggled_back = repo.toggle_reminder_done(&first.id).unwrap().unwrap();
    assert!(!toggled_back.is_done);
}

#[test]
fn toggle_and_delete_of_missing_reminder() {
    let mut repo = repo_with_applications(&["a1"]);
    assert!(repo.toggle_reminder_done("missing").unwrap().is_none());
    repo.delete_reminder("missing").unwrap();

    let reminder = repo
        .save_reminder(Reminder::new("a1", Utc::now(), "Follow up"))
        .unwrap();
    repo.delete_reminder(&reminder.id).unwrap();
    assert!(repo.list_reminders().unwrap().is_empty());
}

#[test]
fn blank_description_is_rejected() {
    let mut repo = repo_with_applications(&["a1"]);
    let err = repo
        .save_reminder(Reminder::new("a1", Utc::now(), "  "))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(RecordValidationError::EmptyDescription)
    ));
}

#[test]
fn upcoming_reminders_skip_done_and_past_days() {
    let mut repo = repo_with_applications(&["a1"]);
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 15, 0, 0).unwrap();

    let yesterday = Reminder::with_id("r-old", "a1", now - Duration::days(1), "Old");
    let earlier_today = Reminder::with_id("r-today", "a1", now - Duration::hours(3), "Today");
    let mut done = Reminder::with_id("r-done", "a1", now + Duration::hours(1), "Done");
    done.is_done = true;
    let next_week = Reminder::with_id("r-week", "a1", now + Duration::days(7), "Week");
    let tomorrow = Reminder::with_id("r-tomorrow", "a1", now + Duration::days(1), "Tomorrow");
    for reminder in [yesterday, next_week, done, tomorrow, earlier_today] {
        repo.save_reminder(reminder).unwrap();
    }

    let upcoming: Vec<String> = repo
        .upcoming_reminders(now, 3)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(upcoming, vec!["r-today", "r-tomorrow", "r-week"]);

    let due_today = repo.reminders_due_on(now.date_naive()).unwrap();
    let ids: Vec<&str> = due_today.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r-done", "r-today"]);
}

#[test]
fn service_refuses_reminders_for_unknown_applications() {
    let mut service = TrackerService::open(MemoryKvStore::new()).unwrap();
    let app = service.create_application("Acme", "Engineer").unwrap();

    let reminder = service
        .schedule_reminder(&app.id, Utc::now(), "Follow up")
        .unwrap();
    assert_eq!(reminder.application_id, app.id);

    let err = service
        .schedule_reminder("ghost", Utc::now(), "Follow up")
        .unwrap_err();
    assert!(matches!(err, ServiceError::ApplicationNotFound(id) if id == "ghost"));
    assert_eq!(service.repo().list_reminders().unwrap().len(), 1);
}
