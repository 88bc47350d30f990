//! Minimal SpreadsheetML writer: one worksheet, inline strings, a fixed style table.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::sheet::{
    ApplicationSheet, Cell, RowFill, COLUMN_WIDTHS, HEADERS, HEADER_FILL, HEADER_FONT_COLOR,
    HEADER_ROW_HEIGHT, SHEET_TITLE,
};
use super::ExportError;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

pub const SHEET_PART: &str = "xl/worksheets/sheet1.xml";
pub const STYLES_PART: &str = "xl/styles.xml";

/// Style index of the header cells in `cellXfs`.
const HEADER_STYLE: usize = 1;
/// Fills 0 and 1 are reserved by the format (`none`, `gray125`); the header fill comes next.
const FIRST_ROW_FILL_ID: usize = 3;

fn row_style(fill: RowFill) -> usize {
    HEADER_STYLE + 1 + fill.position()
}

/// Serializes the sheet into a complete `.xlsx` package.
pub fn write_workbook(sheet: &ApplicationSheet) -> Result<Vec<u8>, ExportError> {
    let parts = [
        ("[Content_Types].xml", content_types()?),
        ("_rels/.rels", package_relationships()?),
        ("xl/workbook.xml", workbook()?),
        ("xl/_rels/workbook.xml.rels", workbook_relationships()?),
        (STYLES_PART, styles()?),
        (SHEET_PART, worksheet(sheet)?),
    ];

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        archive.start_file(name, options)?;
        archive.write_all(&body)?;
    }
    Ok(archive.finish()?.into_inner())
}

/// Spreadsheet column name for a zero-based index (`0` → `A`, `26` → `AA`).
pub fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        name.push(b'A' + offset as u8);
        remaining = (remaining - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Drops characters XML 1.0 cannot carry at all (C0 controls other than tab, LF and CR, plus
/// the U+FFFE/U+FFFF noncharacters). Escaping does not help for these.
fn xml_safe(content: &str) -> Cow<'_, str> {
    fn allowed(ch: char) -> bool {
        match ch {
            '\t' | '\n' | '\r' => true,
            '\u{FFFE}' | '\u{FFFF}' => false,
            _ => !ch.is_ascii_control() || ch == '\u{7F}',
        }
    }

    if content.chars().all(allowed) {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(content.chars().filter(|ch| allowed(*ch)).collect())
    }
}

struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> Result<Self, ExportError> {
        let mut part = Self {
            writer: Writer::new(Vec::new()),
        };
        part.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(part)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), ExportError> {
        self.writer
            .write_event(event)
            .map_err(|err| ExportError::Xml(err.to_string()))
    }

    fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), ExportError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Start(start))
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), ExportError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Empty(start))
    }

    fn close(&mut self, name: &str) -> Result<(), ExportError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text(&mut self, content: &str) -> Result<(), ExportError> {
        let content = xml_safe(content);
        self.event(Event::Text(BytesText::new(&content)))
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn content_types() -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlPart::new()?;
    xml.open("Types", &[("xmlns", CONTENT_TYPES_NS)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            (
                "ContentType",
                "application/vnd.openxmlformats-package.relationships+xml",
            ),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for (part, content_type) in [
        (
            "/xl/workbook.xml",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
        ),
        (
            "/xl/worksheets/sheet1.xml",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
        ),
        (
            "/xl/styles.xml",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml",
        ),
    ] {
        xml.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type)],
        )?;
    }
    xml.close("Types")?;
    Ok(xml.finish())
}

fn package_relationships() -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlPart::new()?;
    xml.open("Relationships", &[("xmlns", PACKAGE_REL_NS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
            ),
            ("Target", "xl/workbook.xml"),
        ],
    )?;
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn workbook() -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlPart::new()?;
    xml.open("workbook", &[("xmlns", MAIN_NS), ("xmlns:r", REL_NS)])?;
    xml.open("sheets", &[])?;
    xml.empty(
        "sheet",
        &[("name", SHEET_TITLE), ("sheetId", "1"), ("r:id", "rId1")],
    )?;
    xml.close("sheets")?;
    xml.close("workbook")?;
    Ok(xml.finish())
}

fn workbook_relationships() -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlPart::new()?;
    xml.open("Relationships", &[("xmlns", PACKAGE_REL_NS)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet",
            ),
            ("Target", "worksheets/sheet1.xml"),
        ],
    )?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId2"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles",
            ),
            ("Target", "styles.xml"),
        ],
    )?;
    xml.close("Relationships")?;
    Ok(xml.finish())
}

fn solid_fill(xml: &mut XmlPart, rgb: &str) -> Result<(), ExportError> {
    let argb = format!("FF{rgb}");
    xml.open("fill", &[])?;
    xml.open("patternFill", &[("patternType", "solid")])?;
    xml.empty("fgColor", &[("rgb", argb.as_str())])?;
    xml.empty("bgColor", &[("indexed", "64")])?;
    xml.close("patternFill")?;
    xml.close("fill")
}

fn styles() -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlPart::new()?;
    xml.open("styleSheet", &[("xmlns", MAIN_NS)])?;

    xml.open("fonts", &[("count", "2")])?;
    xml.open("font", &[])?;
    xml.empty("sz", &[("val", "11")])?;
    xml.empty("name", &[("val", "Calibri")])?;
    xml.empty("family", &[("val", "2")])?;
    xml.close("font")?;
    let header_color = format!("FF{HEADER_FONT_COLOR}");
    xml.open("font", &[])?;
    xml.empty("b", &[])?;
    xml.empty("sz", &[("val", "11")])?;
    xml.empty("color", &[("rgb", header_color.as_str())])?;
    xml.empty("name", &[("val", "Calibri")])?;
    xml.empty("family", &[("val", "2")])?;
    xml.close("font")?;
    xml.close("fonts")?;

    let fill_count = (FIRST_ROW_FILL_ID + RowFill::ALL.len()).to_string();
    xml.open("fills", &[("count", fill_count.as_str())])?;
    for pattern in ["none", "gray125"] {
        xml.open("fill", &[])?;
        xml.empty("patternFill", &[("patternType", pattern)])?;
        xml.close("fill")?;
    }
    solid_fill(&mut xml, HEADER_FILL)?;
    for fill in RowFill::ALL {
        solid_fill(&mut xml, fill.rgb())?;
    }
    xml.close("fills")?;

    xml.open("borders", &[("count", "1")])?;
    xml.open("border", &[])?;
    for side in ["left", "right", "top", "bottom", "diagonal"] {
        xml.empty(side, &[])?;
    }
    xml.close("border")?;
    xml.close("borders")?;

    xml.open("cellStyleXfs", &[("count", "1")])?;
    xml.empty(
        "xf",
        &[
            ("numFmtId", "0"),
            ("fontId", "0"),
            ("fillId", "0"),
            ("borderId", "0"),
        ],
    )?;
    xml.close("cellStyleXfs")?;

    let xf_count = (HEADER_STYLE + 1 + RowFill::ALL.len()).to_string();
    xml.open("cellXfs", &[("count", xf_count.as_str())])?;
    xml.empty(
        "xf",
        &[
            ("numFmtId", "0"),
            ("fontId", "0"),
            ("fillId", "0"),
            ("borderId", "0"),
            ("xfId", "0"),
        ],
    )?;
    xml.open(
        "xf",
        &[
            ("numFmtId", "0"),
            ("fontId", "1"),
            ("fillId", "2"),
            ("borderId", "0"),
            ("xfId", "0"),
            ("applyFont", "1"),
            ("applyFill", "1"),
            ("applyAlignment", "1"),
        ],
    )?;
    xml.empty(
        "alignment",
        &[("horizontal", "center"), ("vertical", "center")],
    )?;
    xml.close("xf")?;
    for fill in RowFill::ALL {
        let fill_id = (FIRST_ROW_FILL_ID + fill.position()).to_string();
        xml.open(
            "xf",
            &[
                ("numFmtId", "0"),
                ("fontId", "0"),
                ("fillId", fill_id.as_str()),
                ("borderId", "0"),
                ("xfId", "0"),
                ("applyFill", "1"),
                ("applyAlignment", "1"),
            ],
        )?;
        xml.empty("alignment", &[("vertical", "center"), ("wrapText", "1")])?;
        xml.close("xf")?;
    }
    xml.close("cellXfs")?;

    xml.open("cellStyles", &[("count", "1")])?;
    xml.empty(
        "cellStyle",
        &[("name", "Normal"), ("xfId", "0"), ("builtinId", "0")],
    )?;
    xml.close("cellStyles")?;

    xml.close("styleSheet")?;
    Ok(xml.finish())
}

fn write_cell(
    xml: &mut XmlPart,
    reference: &str,
    style: usize,
    cell: &Cell,
) -> Result<(), ExportError> {
    let style = style.to_string();
    match cell {
        Cell::Number(value) => {
            xml.open("c", &[("r", reference), ("s", style.as_str())])?;
            xml.open("v", &[])?;
            xml.text(&value.to_string())?;
            xml.close("v")?;
        }
        Cell::Text(value) => {
            xml.open("c", &[("r", reference), ("s", style.as_str()), ("t", "inlineStr")])?;
            xml.open("is", &[])?;
            xml.open("t", &[("xml:space", "preserve")])?;
            xml.text(value)?;
            xml.close("t")?;
            xml.close("is")?;
        }
    }
    xml.close("c")
}

fn worksheet(sheet: &ApplicationSheet) -> Result<Vec<u8>, ExportError> {
    let mut xml = XmlPart::new()?;
    xml.open("worksheet", &[("xmlns", MAIN_NS), ("xmlns:r", REL_NS)])?;

    let last_column = column_name(HEADERS.len() - 1);
    let dimension = format!("A1:{last_column}{}", sheet.rows.len() + 1);
    xml.empty("dimension", &[("ref", dimension.as_str())])?;
    xml.empty("sheetFormatPr", &[("defaultRowHeight", "15")])?;

    xml.open("cols", &[])?;
    for (index, width) in COLUMN_WIDTHS.iter().enumerate() {
        let position = (index + 1).to_string();
        let width = width.to_string();
        xml.empty(
            "col",
            &[
                ("min", position.as_str()),
                ("max", position.as_str()),
                ("width", width.as_str()),
                ("customWidth", "1"),
            ],
        )?;
    }
    xml.close("cols")?;

    xml.open("sheetData", &[])?;

    let height = HEADER_ROW_HEIGHT.to_string();
    xml.open("row", &[("r", "1"), ("ht", height.as_str()), ("customHeight", "1")])?;
    for (index, title) in HEADERS.iter().enumerate() {
        let reference = format!("{}1", column_name(index));
        write_cell(&mut xml, &reference, HEADER_STYLE, &Cell::Text(title.to_string()))?;
    }
    xml.close("row")?;

    for (offset, row) in sheet.rows.iter().enumerate() {
        let row_number = offset + 2;
        let row_ref = row_number.to_string();
        let style = row_style(row.fill);
        xml.open("row", &[("r", row_ref.as_str())])?;
        for (index, cell) in row.cells.iter().enumerate() {
            let reference = format!("{}{row_number}", column_name(index));
            write_cell(&mut xml, &reference, style, cell)?;
        }
        xml.close("row")?;
    }

    xml.close("sheetData")?;
    xml.close("worksheet")?;
    Ok(xml.finish())
}
