use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{ApplicationStatus, JobApplication};

/// Narrowing applied to the dashboard listing.
///
/// Both restrictions are optional and combine with AND. A status filter only ever holds one of
/// the known stages; the search text is already trimmed, lowercased and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationQuery {
    status: Option<ApplicationStatus>,
    search: Option<String>,
}

/// Raw query-string parameters as sent by the dashboard.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ApplicationQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// Builds a query from loosely typed input. Unknown statuses and blank search text are
    /// dropped rather than rejected.
    pub fn from_params(status: Option<&str>, search: Option<&str>) -> Self {
        Self::all().with_status(status).with_search(search)
    }

    pub fn with_status(mut self, status: Option<&str>) -> Self {
        self.status = status.and_then(ApplicationStatus::known);
        self
    }

    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);
        self
    }

    pub fn status(&self) -> Option<&ApplicationStatus> {
        self.status.as_ref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.status.is_none() && self.search.is_none()
    }

    pub fn matches(&self, application: &JobApplication) -> bool {
        let status_ok = self
            .status
            .as_ref()
            .map_or(true, |status| &application.status == status);
        let search_ok = self.search.as_deref().map_or(true, |needle| {
            application.company.to_lowercase().contains(needle)
        });
        status_ok && search_ok
    }

    /// Filters and orders an unsorted set of applications.
    pub fn apply<I>(&self, applications: I) -> Vec<JobApplication>
    where
        I: IntoIterator<Item = JobApplication>,
    {
        let mut selected: Vec<JobApplication> = applications
            .into_iter()
            .filter(|application| self.matches(application))
            .collect();
        selected.sort_by(newest_first);
        selected
    }
}

impl From<&ListParams> for ApplicationQuery {
    fn from(params: &ListParams) -> Self {
        Self::from_params(params.status.as_deref(), params.search.as_deref())
    }
}

/// Listing order: most recent application date first, then most recently created.
pub fn newest_first(left: &JobApplication, right: &JobApplication) -> Ordering {
    right
        .date_applied
        .cmp(&left.date_applied)
        .then_with(|| right.id.cmp(&left.id))
}
