//! Aggregate statistics over the application collection.
//!
//! # Responsibility
//! - Derive point-in-time metrics (counts, response rate, response time).
//! - Provide per-month breakdowns for yearly charts.
//!
//! # Invariants
//! - Functions are pure over their input slice; nothing is cached.
//! - Calendar days and months are taken in UTC.
//! - Any status other than `applied` counts as a response, and response
//!   time is measured up to `date_updated` (the latest change, not the
//!   first transition).

use crate::model::application::{Application, ApplicationStatus};
use crate::repo::tracker_repo::TrackerRepository;
use crate::repo::RepoResult;
use crate::storage::KeyValueStore;
use chrono::Datelike;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Number of applications in each status. All four are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub applied: usize,
    pub interviewing: usize,
    pub offer: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn get(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Applied => self.applied,
            ApplicationStatus::Interviewing => self.interviewing,
            ApplicationStatus::Offer => self.offer,
            ApplicationStatus::Rejected => self.rejected,
        }
    }

    fn increment(&mut self, status: ApplicationStatus) {
        let slot = match status {
            ApplicationStatus::Applied => &mut self.applied,
            ApplicationStatus::Interviewing => &mut self.interviewing,
            ApplicationStatus::Offer => &mut self.offer,
            ApplicationStatus::Rejected => &mut self.rejected,
        };
        *slot += 1;
    }

    /// Sum over all statuses.
    pub fn total(&self) -> usize {
        self.applied + self.interviewing + self.offer + self.rejected
    }
}

/// Snapshot of derived metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total_applications: usize,
    pub status_counts: StatusCounts,
    /// `YYYY-MM-DD` (UTC) of `date_applied` to count.
    pub applications_by_date: BTreeMap<String, usize>,
    /// Percentage in `[0, 100]`.
    pub response_rate: f64,
    pub average_days_to_response: f64,
}

/// Activity of one calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyActivity {
    /// 1-based month number.
    pub month: u32,
    pub applied: usize,
    pub responded: usize,
    pub response_rate: f64,
    pub average_response_days: f64,
}

/// Computes the statistics snapshot for `applications`.
pub fn compute_application_stats(applications: &[Application]) -> ApplicationStats {
    let mut stats = ApplicationStats {
        total_applications: applications.len(),
        ..ApplicationStats::default()
    };

    for app in applications {
        stats.status_counts.increment(app.status);
        let date_key = app.date_applied.format("%Y-%m-%d").to_string();
        *stats.applications_by_date.entry(date_key).or_insert(0) += 1;
    }

    let responded = stats.total_applications - stats.status_counts.applied;
    stats.response_rate = percentage(responded, stats.total_applications);
    stats.average_days_to_response = average_response_days(applications.iter());
    stats
}

/// Reads the current applications through `repo` and computes statistics.
pub fn application_stats<S: KeyValueStore>(
    repo: &TrackerRepository<S>,
) -> RepoResult<ApplicationStats> {
    let applications = repo.list_applications()?;
    Ok(compute_application_stats(&applications))
}

/// Twelve monthly entries (January first) for applications applied in `year`.
pub fn monthly_activity(applications: &[Application], year: i32) -> Vec<MonthlyActivity> {
    (1..=12)
        .map(|month| {
            let in_month: Vec<&Application> = applications
                .iter()
                .filter(|app| {
                    app.date_applied.year() == year && app.date_applied.month() == month
                })
                .collect();
            let responded = in_month
                .iter()
                .filter(|app| app.status.is_response())
                .count();

            MonthlyActivity {
                month,
                applied: in_month.len(),
                responded,
                response_rate: percentage(responded, in_month.len()),
                average_response_days: average_response_days(in_month.into_iter()),
            }
        })
        .collect()
}

/// Distinct application years, newest first.
///
/// Falls back to `[current_year]` when there are no applications.
pub fn available_years(applications: &[Application], current_year: i32) -> Vec<i32> {
    let years: BTreeSet<i32> = applications
        .iter()
        .map(|app| app.date_applied.year())
        .collect();
    if years.is_empty() {
        return vec![current_year];
    }
    years.into_iter().rev().collect()
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn average_response_days<'a>(applications: impl Iterator<Item = &'a Application>) -> f64 {
    let (count, total_days) = applications
        .filter(|app| app.status.is_response())
        .fold((0_usize, 0.0_f64), |(count, total), app| {
            (count + 1, total + app.days_since_applied_at_update())
        });
    if count == 0 {
        return 0.0;
    }
    total_days / count as f64
}

#[cfg(test)]
mod tests {
    use super::{available_years, compute_application_stats, monthly_activity};
    use crate::model::application::{Application, ApplicationStatus};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn app_at(id: &str, applied: DateTime<Utc>, status: ApplicationStatus) -> Application {
        let mut app = Application::with_id(id, "Acme", "Engineer");
        app.date_applied = applied;
        app.date_updated = applied;
        app.status = status;
        app
    }

    #[test]
    fn empty_collection_yields_zeroes() {
        let stats = compute_application_stats(&[]);
        assert_eq!(stats.total_applications, 0);
        assert_eq!(stats.status_counts.total(), 0);
        assert_eq!(stats.response_rate, 0.0);
        assert_eq!(stats.average_days_to_response, 0.0);
        assert!(stats.applications_by_date.is_empty());
    }

    #[test]
    fn date_keys_use_utc_calendar_day() {
        let late = Utc.with_ymd_and_hms(2024, 1, 31, 23, 30, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 2, 1, 0, 15, 0).unwrap();
        let stats = compute_application_stats(&[
            app_at("a", late, ApplicationStatus::Applied),
            app_at("b", early, ApplicationStatus::Applied),
            app_at("c", early, ApplicationStatus::Offer),
        ]);

        assert_eq!(stats.applications_by_date.get("2024-01-31"), Some(&1));
        assert_eq!(stats.applications_by_date.get("2024-02-01"), Some(&2));
    }

    #[test]
    fn monthly_activity_splits_by_month_within_year() {
        let jan = Utc.with_ymd_and_hms(2023, 1, 10, 12, 0, 0).unwrap();
        let mut responded = app_at("b", jan, ApplicationStatus::Rejected);
        responded.date_updated = jan + Duration::days(4);
        let applications = vec![
            app_at("a", jan, ApplicationStatus::Applied),
            responded,
            app_at(
                "c",
                Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
                ApplicationStatus::Offer,
            ),
        ];

        let months = monthly_activity(&applications, 2023);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, 1);
        assert_eq!(months[0].applied, 2);
        assert_eq!(months[0].responded, 1);
        assert_eq!(months[0].response_rate, 50.0);
        assert!((months[0].average_response_days - 4.0).abs() < 1e-9);
        assert!(months[1..].iter().all(|month| month.applied == 0));
    }

    #[test]
    fn available_years_descend_and_default_to_current() {
        assert_eq!(available_years(&[], 2026), vec![2026]);

        let applications = vec![
            app_at(
                "a",
                Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
                ApplicationStatus::Applied,
            ),
            app_at(
                "b",
                Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
                ApplicationStatus::Applied,
            ),
            app_at(
                "c",
                Utc.with_ymd_and_hms(2023, 9, 1, 0, 0, 0).unwrap(),
                ApplicationStatus::Offer,
            ),
        ];
        assert_eq!(available_years(&applications, 2026), vec![2025, 2023]);
    }
}
