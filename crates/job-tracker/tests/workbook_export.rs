use std::io::{Cursor, Read};
use std::sync::Arc;

use chrono::NaiveDate;
use job_tracker::applications::{ApplicationDraft, ApplicationService};
use job_tracker::export::{ExportFormat, SpreadsheetExport};
use job_tracker::store::InMemoryApplicationRepository;
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, PartialEq)]
struct ParsedRow {
    style: Option<String>,
    height: Option<String>,
    cells: Vec<String>,
}

fn read_part(export: &SpreadsheetExport, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(export.bytes.clone())).expect("zip opens");
    let mut part = archive.by_name(name).expect("part present");
    let mut content = String::new();
    part.read_to_string(&mut content).expect("part readable");
    content
}

fn attribute(start: &quick_xml::events::BytesStart<'_>, key: &str) -> Option<String> {
    start
        .try_get_attribute(key)
        .expect("attribute parses")
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn parse_rows(xml: &str) -> Vec<ParsedRow> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut rows: Vec<ParsedRow> = Vec::new();
    let mut in_value = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => rows.push(ParsedRow {
                    style: None,
                    height: attribute(e, "ht"),
                    cells: Vec::new(),
                }),
                b"c" => {
                    if let Some(row) = rows.last_mut() {
                        row.style = attribute(e, "s");
                        row.cells.push(String::new());
                    }
                }
                b"t" | b"v" => in_value = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => {
                if matches!(e.local_name().as_ref(), b"t" | b"v") {
                    in_value = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_value {
                    let decoded = e.unescape().unwrap_or_default();
                    if let Some(cell) = rows.last_mut().and_then(|row| row.cells.last_mut()) {
                        cell.push_str(&decoded);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => panic!("worksheet xml is malformed: {err}"),
            _ => {}
        }
    }
    rows
}

fn service_with(records: &[(&str, &str, &str, &str)]) -> ApplicationService<InMemoryApplicationRepository> {
    let service = ApplicationService::new(Arc::new(InMemoryApplicationRepository::new()));
    for (company, role, date, status) in records {
        service
            .create_draft(
                ApplicationDraft::new(*company, *role)
                    .applied_on(NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"))
                    .with_status(*status)
                    .with_notes("via careers page"),
            )
            .expect("seed");
    }
    service
}

#[test]
fn empty_tracker_exports_header_only() {
    let service = service_with(&[]);
    let export = service.export(ExportFormat::Xlsx).expect("export");

    assert_eq!(export.rows, 0);
    assert_eq!(export.file_name(), "job_applications.xlsx");

    let rows = parse_rows(&read_part(&export, "xl/worksheets/sheet1.xml"));
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].cells,
        vec!["#", "Company", "Role", "Date Applied", "Status", "Notes"]
    );
    assert_eq!(rows[0].height.as_deref(), Some("20"));
    assert_eq!(rows[0].style.as_deref(), Some("1"));
}

#[test]
fn rows_follow_listing_order_with_status_fills() {
    let service = service_with(&[
        ("Acme", "Engineer", "2024-01-15", "Pending"),
        ("Globex", "Analyst", "2024-03-01", "Rejected"),
        ("Initech", "Designer", "2024-02-10", "Interview Scheduled"),
        ("Umbrella", "Chemist", "2024-02-01", "Withdrawn"),
        ("Hooli", "Manager", "2023-12-24", "Selected"),
    ]);
    let export = service.export(ExportFormat::Xlsx).expect("export");
    let rows = parse_rows(&read_part(&export, "xl/worksheets/sheet1.xml"));

    assert_eq!(rows.len(), 6);
    let summary: Vec<(String, String, Option<String>)> = rows[1..]
        .iter()
        .map(|row| (row.cells[0].clone(), row.cells[1].clone(), row.style.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("1".to_string(), "Globex".to_string(), Some("5".to_string())),
            ("2".to_string(), "Initech".to_string(), Some("3".to_string())),
            ("3".to_string(), "Umbrella".to_string(), Some("6".to_string())),
            ("4".to_string(), "Acme".to_string(), Some("2".to_string())),
            ("5".to_string(), "Hooli".to_string(), Some("4".to_string())),
        ]
    );
    assert_eq!(
        rows[1].cells,
        vec!["1", "Globex", "Analyst", "2024-03-01", "Rejected", "via careers page"]
    );
}

#[test]
fn styles_carry_the_status_palette() {
    let service = service_with(&[("Acme", "Engineer", "2024-01-15", "Pending")]);
    let export = service.export(ExportFormat::Xlsx).expect("export");
    let styles = read_part(&export, "xl/styles.xml");

    for rgb in ["FF1A1A2E", "FFFFF3CD", "FFCFE2FF", "FFD1E7DD", "FFF8D7DA", "FFFFFFFF"] {
        assert!(styles.contains(rgb), "missing fill {rgb}");
    }

    let workbook = read_part(&export, "xl/workbook.xml");
    assert!(workbook.contains("name=\"Job Applications\""));
}

#[test]
fn exporting_twice_yields_identical_rows() {
    let service = service_with(&[
        ("Acme", "Engineer", "2024-01-15", "Pending"),
        ("Globex", "Analyst", "2024-03-01", "Selected"),
    ]);

    let first = service.export(ExportFormat::Xlsx).expect("export");
    let second = service.export(ExportFormat::Xlsx).expect("export");

    assert_eq!(
        parse_rows(&read_part(&first, "xl/worksheets/sheet1.xml")),
        parse_rows(&read_part(&second, "xl/worksheets/sheet1.xml"))
    );
}

#[test]
fn csv_export_mirrors_the_sheet() {
    let service = service_with(&[("Acme, Inc.", "Engineer", "2024-01-15", "Pending")]);
    let export = service.export(ExportFormat::Csv).expect("export");

    assert_eq!(export.file_name(), "job_applications.csv");
    let text = String::from_utf8(export.bytes).expect("utf-8");
    assert_eq!(
        text,
        "#,Company,Role,Date Applied,Status,Notes\n1,\"Acme, Inc.\",Engineer,2024-01-15,Pending,via careers page\n"
    );
}

#[test]
fn control_characters_in_notes_do_not_break_the_workbook() {
    let service = ApplicationService::new(Arc::new(InMemoryApplicationRepository::new()));
    service
        .create_draft(
            ApplicationDraft::new("Acme", "Engineer")
                .applied_on(NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"))
                .with_notes("call\u{0B}back \u{1B}[1m\nsoon"),
        )
        .expect("seed");

    let export = service.export(ExportFormat::Xlsx).expect("export");
    let xml = read_part(&export, "xl/worksheets/sheet1.xml");
    assert!(!xml
        .chars()
        .any(|ch| ch.is_ascii_control() && !matches!(ch, '\t' | '\n' | '\r')));

    let rows = parse_rows(&xml);
    assert_eq!(rows[1].cells[5], "callback [1m\nsoon");
}
