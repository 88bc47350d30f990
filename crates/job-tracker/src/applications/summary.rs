use serde::Serialize;

use super::domain::{ApplicationStatus, JobApplication};

/// Dashboard counts over the whole record set, independent of any active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub pending: usize,
    pub interview: usize,
    pub selected: usize,
    pub rejected: usize,
}

impl ApplicationSummary {
    pub fn tally<'a, I>(applications: I) -> Self
    where
        I: IntoIterator<Item = &'a JobApplication>,
    {
        applications
            .into_iter()
            .fold(Self::default(), |mut summary, application| {
                summary.record(&application.status, 1);
                summary
            })
    }

    /// Adds `count` records holding `status`. Statuses outside the known stages only move the
    /// total.
    pub fn record(&mut self, status: &ApplicationStatus, count: usize) {
        self.total += count;
        match status {
            ApplicationStatus::Pending => self.pending += count,
            ApplicationStatus::InterviewScheduled => self.interview += count,
            ApplicationStatus::Selected => self.selected += count,
            ApplicationStatus::Rejected => self.rejected += count,
            ApplicationStatus::Other(_) => {}
        }
    }

    pub fn bucketed(&self) -> usize {
        self.pending + self.interview + self.selected + self.rejected
    }

    pub fn count_for(&self, status: &ApplicationStatus) -> Option<usize> {
        match status {
            ApplicationStatus::Pending => Some(self.pending),
            ApplicationStatus::InterviewScheduled => Some(self.interview),
            ApplicationStatus::Selected => Some(self.selected),
            ApplicationStatus::Rejected => Some(self.rejected),
            ApplicationStatus::Other(_) => None,
        }
    }
}
