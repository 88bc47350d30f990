use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier for a tracked application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub i64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an application currently stands.
///
/// Writes are permissive: a label outside the four known stages is kept verbatim in
/// [`ApplicationStatus::Other`] instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    InterviewScheduled,
    Selected,
    Rejected,
    Other(String),
}

impl ApplicationStatus {
    /// The fixed stages offered by the forms, in display order.
    pub const KNOWN: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Selected,
        ApplicationStatus::Rejected,
    ];

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::InterviewScheduled => "Interview Scheduled",
            Self::Selected => "Selected",
            Self::Rejected => "Rejected",
            Self::Other(raw) => raw,
        }
    }

    /// Resolves a label to one of the known stages, or `None` for anything else.
    pub fn known(raw: &str) -> Option<Self> {
        match raw {
            "Pending" => Some(Self::Pending),
            "Interview Scheduled" => Some(Self::InterviewScheduled),
            "Selected" => Some(Self::Selected),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ApplicationStatus {
    fn from(raw: String) -> Self {
        Self::known(&raw).unwrap_or(Self::Other(raw))
    }
}

impl From<&str> for ApplicationStatus {
    fn from(raw: &str) -> Self {
        Self::known(raw).unwrap_or_else(|| Self::Other(raw.to_string()))
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Other(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A persisted job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub company: String,
    pub role: String,
    pub date_applied: NaiveDate,
    pub status: ApplicationStatus,
    pub notes: String,
}

/// The mutable fields of an application, as accepted by create and edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub company: String,
    pub role: String,
    pub date_applied: NaiveDate,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub notes: String,
}

impl ApplicationDraft {
    /// Draft dated today with the default status and no notes.
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
            date_applied: Local::now().date_naive(),
            status: ApplicationStatus::default(),
            notes: String::new(),
        }
    }

    pub fn applied_on(mut self, date_applied: NaiveDate) -> Self {
        self.date_applied = date_applied;
        self
    }

    pub fn with_status(mut self, status: impl Into<ApplicationStatus>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn into_application(self, id: ApplicationId) -> JobApplication {
        JobApplication {
            id,
            company: self.company,
            role: self.role,
            date_applied: self.date_applied,
            status: self.status,
            notes: self.notes,
        }
    }
}

impl JobApplication {
    pub fn draft(&self) -> ApplicationDraft {
        ApplicationDraft {
            company: self.company.clone(),
            role: self.role.clone(),
            date_applied: self.date_applied,
            status: self.status.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Overwrites every mutable field; the id never changes.
    pub fn apply(&mut self, draft: ApplicationDraft) {
        self.company = draft.company;
        self.role = draft.role;
        self.date_applied = draft.date_applied;
        self.status = draft.status;
        self.notes = draft.notes;
    }
}
