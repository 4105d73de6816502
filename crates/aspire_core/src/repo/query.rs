//! List filtering and ordering for application overviews.

use crate::model::application::{Application, ApplicationStatus};
use std::cmp::Ordering;

/// Ordering applied by `ApplicationListQuery`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplicationSort {
    /// Newest `date_applied` first.
    #[default]
    DateAppliedDesc,
    DateAppliedAsc,
    /// Case-insensitive company name, A to Z.
    CompanyAsc,
    CompanyDesc,
}

/// Query options for listing applications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationListQuery {
    /// Exact status filter.
    pub status: Option<ApplicationStatus>,
    /// Case-insensitive substring matched against company, position,
    /// location, notes and tags. Blank text matches everything.
    pub text: Option<String>,
    pub sort: ApplicationSort,
    pub limit: Option<usize>,
}

impl ApplicationListQuery {
    /// Filters, sorts and truncates `applications`.
    pub fn apply(&self, applications: Vec<Application>) -> Vec<Application> {
        let needle = self
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);

        let mut selected: Vec<Application> = applications
            .into_iter()
            .filter(|app| self.status.map_or(true, |status| app.status == status))
            .filter(|app| needle.as_deref().map_or(true, |text| matches_text(app, text)))
            .collect();

        selected.sort_by(|a, b| compare(self.sort, a, b));

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

fn matches_text(app: &Application, needle: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(needle);

    contains(&app.company_name)
        || contains(&app.position)
        || app.location.as_deref().is_some_and(contains)
        || app.notes.as_deref().is_some_and(contains)
        || app.tags.iter().any(|tag| contains(tag.as_str()))
}

fn compare(sort: ApplicationSort, a: &Application, b: &Application) -> Ordering {
    match sort {
        ApplicationSort::DateAppliedDesc => b.date_applied.cmp(&a.date_applied),
        ApplicationSort::DateAppliedAsc => a.date_applied.cmp(&b.date_applied),
        ApplicationSort::CompanyAsc => compare_company(a, b),
        ApplicationSort::CompanyDesc => compare_company(b, a),
    }
}

fn compare_company(a: &Application, b: &Application) -> Ordering {
    a.company_name
        .to_lowercase()
        .cmp(&b.company_name.to_lowercase())
        .then_with(|| a.company_name.cmp(&b.company_name))
}

#[cfg(test)]
mod tests {
    use super::{ApplicationListQuery, ApplicationSort};
    use crate::model::application::{Application, ApplicationStatus};
    use chrono::{Duration, Utc};

    fn sample() -> Vec<Application> {
        let base = Utc::now() - Duration::days(10);
        let mut acme = Application::with_id("a1", "Acme", "Backend Engineer");
        acme.date_applied = base;
        acme.add_tag("remote");

        let mut globex = Application::with_id("a2", "globex", "Designer");
        globex.date_applied = base + Duration::days(2);
        globex.status = ApplicationStatus::Rejected;
        globex.notes = Some("Recruiter mentioned Rust".to_string());

        let mut initech = Application::with_id("a3", "Initech", "Engineer");
        initech.date_applied = base + Duration::days(1);
        initech.location = Some("Austin".to_string());
        vec![acme, globex, initech]
    }

    fn ids(apps: &[Application]) -> Vec<&str> {
        apps.iter().map(|app| app.id.as_str()).collect()
    }

    #[test]
    fn default_query_sorts_newest_first() {
        let result = ApplicationListQuery::default().apply(sample());
        assert_eq!(ids(&result), vec!["a2", "a3", "a1"]);
    }

    #[test]
    fn text_search_is_case_insensitive_across_fields() {
        let query = |text: &str| ApplicationListQuery {
            text: Some(text.to_string()),
            sort: ApplicationSort::DateAppliedAsc,
            ..ApplicationListQuery::default()
        };

        assert_eq!(ids(&query("ENGINEER").apply(sample())), vec!["a1", "a3"]);
        assert_eq!(ids(&query("austin").apply(sample())), vec!["a3"]);
        assert_eq!(ids(&query("rust").apply(sample())), vec!["a2"]);
        assert_eq!(ids(&query("REMOTE").apply(sample())), vec!["a1"]);
        assert_eq!(query("  ").apply(sample()).len(), 3);
    }

    #[test]
    fn status_filter_and_company_sort() {
        let query = ApplicationListQuery {
            status: Some(ApplicationStatus::Applied),
            sort: ApplicationSort::CompanyDesc,
            ..ApplicationListQuery::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec!["a3", "a1"]);

        let query = ApplicationListQuery {
            sort: ApplicationSort::CompanyAsc,
            limit: Some(2),
            ..ApplicationListQuery::default()
        };
        assert_eq!(ids(&query.apply(sample())), vec!["a1", "a2"]);
    }
}
