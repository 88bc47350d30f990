use askama::Template;

use super::domain::{ApplicationId, ApplicationStatus, JobApplication};
use super::form::{ApplicationForm, DATE_FORMAT};
use super::summary::ApplicationSummary;

/// One-shot confirmation shown on the dashboard after a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Added,
    Updated,
    Deleted,
}

impl Notice {
    pub fn from_param(raw: &str) -> Option<Self> {
        match raw {
            "added" => Some(Self::Added),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    pub const fn param(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }

    /// Tail of the confirmation sentence, after "Application" or "Application to <company>".
    pub const fn outcome(self) -> &'static str {
        match self {
            Self::Added => "added successfully!",
            Self::Updated => "updated!",
            Self::Deleted => "deleted.",
        }
    }

    /// Alert flavour; deletions are informational.
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Added | Self::Updated => "success",
            Self::Deleted => "info",
        }
    }

    /// Dashboard URL carrying the notice and the company it concerns.
    pub fn location(self, company: &str) -> String {
        format!(
            "/?notice={}&company={}",
            self.param(),
            urlencoding::encode(company)
        )
    }
}

/// A decoded notice ready for the dashboard banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: &'static str,
    pub company: String,
    pub outcome: &'static str,
}

impl Flash {
    fn new(notice: Notice, company: Option<&str>) -> Self {
        Self {
            kind: notice.kind(),
            company: company.map(str::trim).unwrap_or_default().to_string(),
            outcome: notice.outcome(),
        }
    }

    /// Unknown notice keys are ignored.
    pub fn from_params(notice: Option<&str>, company: Option<&str>) -> Option<Self> {
        notice
            .and_then(Notice::from_param)
            .map(|notice| Self::new(notice, company))
    }
}

/// Error carried across the "start over" redirect after a bad date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormNotice {
    InvalidDate,
}

impl FormNotice {
    pub fn from_param(raw: &str) -> Option<Self> {
        match raw {
            "invalid_date" => Some(Self::InvalidDate),
            _ => None,
        }
    }

    pub const fn param(self) -> &'static str {
        match self {
            Self::InvalidDate => "invalid_date",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidDate => "Invalid date format.",
        }
    }
}

/// Badge flavour per status; unknown statuses get a neutral badge.
pub fn badge(status: &ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Pending => "warning",
        ApplicationStatus::InterviewScheduled => "primary",
        ApplicationStatus::Selected => "success",
        ApplicationStatus::Rejected => "danger",
        ApplicationStatus::Other(_) => "secondary",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    pub value: String,
    pub selected: bool,
}

/// The known stages, marking `current` as selected. A non-empty label outside the known set is
/// appended so editing such a record does not silently change its status.
pub fn status_options(current: &str) -> Vec<StatusOption> {
    let mut options: Vec<StatusOption> = ApplicationStatus::KNOWN
        .iter()
        .map(|status| StatusOption {
            value: status.label().to_string(),
            selected: status.label() == current,
        })
        .collect();

    if !current.is_empty() && !ApplicationStatus::from(current).is_known() {
        options.push(StatusOption {
            value: current.to_string(),
            selected: true,
        });
    }
    options
}

#[derive(Debug, Clone)]
pub struct ApplicationRow {
    pub id: i64,
    pub company: String,
    pub role: String,
    pub date_applied: String,
    pub status: String,
    pub badge: &'static str,
    pub notes: String,
}

impl From<&JobApplication> for ApplicationRow {
    fn from(application: &JobApplication) -> Self {
        Self {
            id: application.id.0,
            company: application.company.clone(),
            role: application.role.clone(),
            date_applied: application.date_applied.format(DATE_FORMAT).to_string(),
            status: application.status.label().to_string(),
            badge: badge(&application.status),
            notes: application.notes.clone(),
        }
    }
}

/// One per-status count on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCard {
    pub label: &'static str,
    pub count: usize,
}

fn status_cards(summary: &ApplicationSummary) -> Vec<StatusCard> {
    ApplicationStatus::KNOWN
        .iter()
        .filter_map(|status| {
            let label = match status {
                ApplicationStatus::Pending => "Pending",
                ApplicationStatus::InterviewScheduled => "Interview Scheduled",
                ApplicationStatus::Selected => "Selected",
                ApplicationStatus::Rejected => "Rejected",
                ApplicationStatus::Other(_) => return None,
            };
            summary
                .count_for(status)
                .map(|count| StatusCard { label, count })
        })
        .collect()
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub summary: ApplicationSummary,
    pub cards: Vec<StatusCard>,
    pub rows: Vec<ApplicationRow>,
    pub filter_options: Vec<StatusOption>,
    pub search: String,
    pub notice: Option<Flash>,
    pub filtered: bool,
}

impl DashboardPage {
    pub fn new(
        applications: &[JobApplication],
        summary: ApplicationSummary,
        status_filter: &str,
        search: &str,
        notice: Option<Flash>,
    ) -> Self {
        let filter_options = ApplicationStatus::KNOWN
            .iter()
            .map(|status| StatusOption {
                value: status.label().to_string(),
                selected: status.label() == status_filter,
            })
            .collect();

        Self {
            cards: status_cards(&summary),
            summary,
            rows: applications.iter().map(ApplicationRow::from).collect(),
            filter_options,
            search: search.trim().to_string(),
            notice,
            filtered: ApplicationStatus::known(status_filter).is_some()
                || !search.trim().is_empty(),
        }
    }
}

#[derive(Template)]
#[template(path = "form.html")]
pub struct FormPage {
    pub title: &'static str,
    pub action: String,
    pub form: ApplicationForm,
    pub status_options: Vec<StatusOption>,
    pub error: Option<String>,
}

impl FormPage {
    pub fn add(form: ApplicationForm, error: Option<String>) -> Self {
        Self::build("Add Application", "/add".to_string(), form, error)
    }

    pub fn edit(id: ApplicationId, form: ApplicationForm, error: Option<String>) -> Self {
        Self::build("Edit Application", format!("/edit/{id}"), form, error)
    }

    fn build(
        title: &'static str,
        action: String,
        form: ApplicationForm,
        error: Option<String>,
    ) -> Self {
        let status_options = status_options(form.status_label());
        Self {
            title,
            action,
            form,
            status_options,
            error,
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage {
    pub message: String,
}
