use crate::applications::form::DATE_FORMAT;
use crate::applications::{ApplicationStatus, JobApplication};

pub const SHEET_TITLE: &str = "Job Applications";

pub const HEADERS: [&str; 6] = ["#", "Company", "Role", "Date Applied", "Status", "Notes"];

/// Column widths in character units, one per header.
pub const COLUMN_WIDTHS: [f64; 6] = [5.0, 25.0, 25.0, 15.0, 22.0, 40.0];

pub const HEADER_ROW_HEIGHT: f64 = 20.0;
pub const HEADER_FILL: &str = "1A1A2E";
pub const HEADER_FONT_COLOR: &str = "FFFFFF";

/// Background applied to a whole data row, keyed by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowFill {
    Pending,
    Interview,
    Selected,
    Rejected,
    Neutral,
}

impl RowFill {
    pub const ALL: [RowFill; 5] = [
        RowFill::Pending,
        RowFill::Interview,
        RowFill::Selected,
        RowFill::Rejected,
        RowFill::Neutral,
    ];

    pub fn for_status(status: &ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Pending => RowFill::Pending,
            ApplicationStatus::InterviewScheduled => RowFill::Interview,
            ApplicationStatus::Selected => RowFill::Selected,
            ApplicationStatus::Rejected => RowFill::Rejected,
            ApplicationStatus::Other(_) => RowFill::Neutral,
        }
    }

    /// RGB hex without the leading `#`.
    pub const fn rgb(self) -> &'static str {
        match self {
            RowFill::Pending => "FFF3CD",
            RowFill::Interview => "CFE2FF",
            RowFill::Selected => "D1E7DD",
            RowFill::Rejected => "F8D7DA",
            RowFill::Neutral => "FFFFFF",
        }
    }

    pub const fn position(self) -> usize {
        match self {
            RowFill::Pending => 0,
            RowFill::Interview => 1,
            RowFill::Selected => 2,
            RowFill::Rejected => 3,
            RowFill::Neutral => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Number(usize),
    Text(String),
}

impl Cell {
    pub fn as_text(&self) -> String {
        match self {
            Cell::Number(value) => value.to_string(),
            Cell::Text(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub cells: Vec<Cell>,
    pub fill: RowFill,
}

/// Format-independent table of the export: one row per application in the given order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationSheet {
    pub rows: Vec<SheetRow>,
}

impl ApplicationSheet {
    pub fn from_applications(applications: &[JobApplication]) -> Self {
        let rows = applications
            .iter()
            .enumerate()
            .map(|(index, application)| SheetRow {
                cells: vec![
                    Cell::Number(index + 1),
                    Cell::Text(application.company.clone()),
                    Cell::Text(application.role.clone()),
                    Cell::Text(application.date_applied.format(DATE_FORMAT).to_string()),
                    Cell::Text(application.status.label().to_string()),
                    Cell::Text(application.notes.clone()),
                ],
                fill: RowFill::for_status(&application.status),
            })
            .collect();

        Self { rows }
    }

    pub fn header(&self) -> [&'static str; 6] {
        HEADERS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::{ApplicationDraft, ApplicationId};
    use chrono::NaiveDate;

    #[test]
    fn rows_number_from_one_independent_of_id() {
        let applications = vec![
            ApplicationDraft::new("Acme", "Engineer")
                .applied_on(NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"))
                .with_status("Selected")
                .into_application(ApplicationId(40)),
            ApplicationDraft::new("Globex", "Analyst")
                .applied_on(NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"))
                .with_status("Withdrawn")
                .with_notes("moved on")
                .into_application(ApplicationId(12)),
        ];

        let sheet = ApplicationSheet::from_applications(&applications);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(
            sheet.rows[0].cells,
            vec![
                Cell::Number(1),
                Cell::Text("Acme".to_string()),
                Cell::Text("Engineer".to_string()),
                Cell::Text("2024-03-01".to_string()),
                Cell::Text("Selected".to_string()),
                Cell::Text(String::new()),
            ]
        );
        assert_eq!(sheet.rows[0].fill, RowFill::Selected);
        assert_eq!(sheet.rows[1].cells[0], Cell::Number(2));
        assert_eq!(sheet.rows[1].fill, RowFill::Neutral);
        assert_eq!(sheet.rows[1].fill.rgb(), "FFFFFF");
    }

    #[test]
    fn fill_positions_follow_all_order() {
        for (expected, fill) in RowFill::ALL.iter().enumerate() {
            assert_eq!(fill.position(), expected);
        }
    }
}
