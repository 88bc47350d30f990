use super::sheet::ApplicationSheet;
use super::ExportError;

/// Plain CSV rendition of the sheet: same header and row order, no styling.
pub fn write_csv(sheet: &ApplicationSheet) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(sheet.header())?;
    for row in &sheet.rows {
        writer.write_record(row.cells.iter().map(|cell| cell.as_text()))?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}
