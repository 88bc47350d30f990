//! Spreadsheet export of the full application list.
//!
//! [`ApplicationSheet`] holds the table independent of file format; [`render`] turns it into a
//! downloadable document.

mod delimited;
pub mod sheet;
pub mod xlsx;

pub use sheet::{ApplicationSheet, Cell, RowFill, SheetRow};

use crate::applications::JobApplication;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub const fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "job_applications.xlsx",
            ExportFormat::Csv => "job_applications.csv",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => XLSX_CONTENT_TYPE,
            ExportFormat::Csv => CSV_CONTENT_TYPE,
        }
    }
}

/// A rendered export, ready to be sent as an attachment or written to disk.
#[derive(Debug, Clone)]
pub struct SpreadsheetExport {
    pub format: ExportFormat,
    pub rows: usize,
    pub bytes: Vec<u8>,
}

impl SpreadsheetExport {
    pub fn file_name(&self) -> &'static str {
        self.format.file_name()
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write spreadsheet xml: {0}")]
    Xml(String),
    #[error("failed to package workbook: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Renders applications, already in listing order, into the requested format.
pub fn render(
    format: ExportFormat,
    applications: &[JobApplication],
) -> Result<SpreadsheetExport, ExportError> {
    let sheet = ApplicationSheet::from_applications(applications);
    let bytes = match format {
        ExportFormat::Xlsx => xlsx::write_workbook(&sheet)?,
        ExportFormat::Csv => delimited::write_csv(&sheet)?,
    };

    Ok(SpreadsheetExport {
        format,
        rows: sheet.rows.len(),
        bytes,
    })
}
