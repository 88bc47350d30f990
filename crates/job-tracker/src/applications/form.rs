use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationDraft, ApplicationStatus, JobApplication};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DEFAULT_STATUS_LABEL: &str = "Pending";

/// Raw add/edit form submission. Every field arrives as text so a rejected submission can be
/// shown back to the user exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub date_applied: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Fields that must be present after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequiredField {
    Company,
    Role,
    DateApplied,
}

impl RequiredField {
    pub const fn label(self) -> &'static str {
        match self {
            RequiredField::Company => "Company",
            RequiredField::Role => "Role",
            RequiredField::DateApplied => "Date Applied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Company, Role, and Date Applied are required.")]
    MissingFields { missing: Vec<RequiredField> },
    #[error("Invalid date format.")]
    InvalidDate { raw: String },
}

impl ApplicationForm {
    /// Empty form with the date pre-filled.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            date_applied: today.format(DATE_FORMAT).to_string(),
            status: Some(DEFAULT_STATUS_LABEL.to_string()),
            ..Self::default()
        }
    }

    pub fn from_application(application: &JobApplication) -> Self {
        Self {
            company: application.company.clone(),
            role: application.role.clone(),
            date_applied: application.date_applied.format(DATE_FORMAT).to_string(),
            status: Some(application.status.label().to_string()),
            notes: application.notes.clone(),
        }
    }

    /// Status label to pre-select when the form is rendered.
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS_LABEL)
    }

    /// Checks required fields, then the date. Status is accepted as supplied.
    pub fn validate(&self) -> Result<ApplicationDraft, ValidationError> {
        let company = self.company.trim();
        let role = self.role.trim();
        let raw_date = self.date_applied.trim();

        let missing: Vec<RequiredField> = [
            (RequiredField::Company, company),
            (RequiredField::Role, role),
            (RequiredField::DateApplied, raw_date),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { missing });
        }

        let date_applied = parse_iso_date(raw_date).ok_or_else(|| ValidationError::InvalidDate {
            raw: raw_date.to_string(),
        })?;

        let status = match self.status.as_deref() {
            Some(raw) => ApplicationStatus::from(raw),
            None => ApplicationStatus::Pending,
        };

        Ok(ApplicationDraft {
            company: company.to_string(),
            role: role.to_string(),
            date_applied,
            status,
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Strict `YYYY-MM-DD`: four-digit year, zero-padded month and day, no sign.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}
