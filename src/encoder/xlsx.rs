use std::io::{Cursor, Write};

use quick_xml::events::BytesStart;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::XmlDocument;
use crate::coordinate::{to_decimal, to_dm, to_dms};
use crate::error::ConvertError;
use crate::options::CoordinateFormat;
use crate::waypoint_types::{Axis, REQUIRED_COLUMNS, Waypoint};

type Result<T> = std::result::Result<T, ConvertError>;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>
"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>
"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>
"#;

/// Excel rejects longer sheet names.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Encode waypoints as a workbook with a `Longitude, Latitude, Description`
/// header row. Coordinates are written as text in the requested format.
pub fn encode(
    waypoints: &[Waypoint],
    route_name: &str,
    coordinate_format: CoordinateFormat,
) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, Vec<u8>); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes().to_vec()),
        ("xl/workbook.xml", workbook_xml(&sheet_name(route_name))?),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes().to_vec()),
        (
            "xl/worksheets/sheet1.xml",
            worksheet_xml(waypoints, coordinate_format)?,
        ),
    ];
    for (path, bytes) in parts {
        zip.start_file(path, options)?;
        zip.write_all(&bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>> {
    let mut doc = XmlDocument::compact(Some("yes"))?;
    doc.open(
        BytesStart::new("workbook")
            .with_attributes([("xmlns", SPREADSHEET_NS), ("xmlns:r", RELATIONSHIPS_NS)]),
    )?;
    doc.open_tag("sheets")?;
    doc.empty(BytesStart::new("sheet").with_attributes([
        ("name", sheet_name),
        ("sheetId", "1"),
        ("r:id", "rId1"),
    ]))?;
    doc.close("sheets")?;
    doc.close("workbook")?;
    Ok(doc.finish())
}

fn worksheet_xml(waypoints: &[Waypoint], coordinate_format: CoordinateFormat) -> Result<Vec<u8>> {
    let mut doc = XmlDocument::compact(Some("yes"))?;
    doc.open(BytesStart::new("worksheet").with_attributes([("xmlns", SPREADSHEET_NS)]))?;
    doc.open_tag("sheetData")?;

    write_row(&mut doc, 1, REQUIRED_COLUMNS)?;
    for (i, wpt) in waypoints.iter().enumerate() {
        let lon = render(wpt.longitude, Axis::Longitude, coordinate_format);
        let lat = render(wpt.latitude, Axis::Latitude, coordinate_format);
        let cells = [lon.as_str(), lat.as_str(), wpt.description.as_str()];
        write_row(&mut doc, i + 2, &cells)?;
    }

    doc.close("sheetData")?;
    doc.close("worksheet")?;
    Ok(doc.finish())
}

/// Write one row of inline-string cells starting at column A.
fn write_row(doc: &mut XmlDocument, row: usize, values: &[&str]) -> Result<()> {
    let row_ref = row.to_string();
    doc.open(BytesStart::new("row").with_attributes([("r", row_ref.as_str())]))?;
    for (col, value) in values.iter().enumerate() {
        let cell_ref = format!("{}{row}", column_letter(col));
        doc.open(
            BytesStart::new("c").with_attributes([("r", cell_ref.as_str()), ("t", "inlineStr")]),
        )?;
        doc.open_tag("is")?;
        if value.trim() != *value {
            doc.open(BytesStart::new("t").with_attributes([("xml:space", "preserve")]))?;
        } else {
            doc.open_tag("t")?;
        }
        doc.text(value)?;
        doc.close("t")?;
        doc.close("is")?;
        doc.close("c")?;
    }
    doc.close("row")
}

fn column_letter(col: usize) -> char {
    (b'A' + col as u8) as char
}

fn render(value: f64, axis: Axis, format: CoordinateFormat) -> String {
    match format {
        CoordinateFormat::Decimal => to_decimal(value),
        CoordinateFormat::DegreesMinutes => to_dm(value, axis),
        CoordinateFormat::DegreesMinutesSeconds => to_dms(value, axis),
    }
}

/// Replace characters Excel forbids in sheet names and cap the length.
fn sheet_name(route_name: &str) -> String {
    let cleaned: String = route_name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Reader, open_workbook_auto_from_rs};

    use crate::spreadsheet::parse_workbook;

    fn sample() -> Vec<Waypoint> {
        vec![
            Waypoint::new(40.446111, -79.982222, "Pittsburgh"),
            Waypoint::new(-33.865, 151.2094, "Sydney"),
        ]
    }

    #[test]
    fn test_package_is_a_zip() {
        let bytes = encode(&sample(), "Route", CoordinateFormat::Decimal).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_decimal_reads_back() {
        let bytes = encode(&sample(), "Route", CoordinateFormat::Decimal).unwrap();
        let table = parse_workbook(&bytes).unwrap();

        assert_eq!(table.route_name, "Route");
        assert_eq!(table.len(), 2);
        assert!((table.waypoints[0].latitude - 40.4461).abs() < 1e-9);
        assert!((table.waypoints[0].longitude + 79.9822).abs() < 1e-9);
        assert_eq!(table.waypoints[1].description, "Sydney");
    }

    #[test]
    fn test_dms_cells() {
        let bytes = encode(&sample(), "Route", CoordinateFormat::DegreesMinutesSeconds).unwrap();
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.as_slice())).unwrap();
        let range = workbook.worksheet_range("Route").unwrap();

        let text = |row: usize, col: usize| range[(row, col)].to_string();
        assert_eq!(text(1, 0), "79°58'56\"W");
        assert_eq!(text(1, 1), "40°26'46\"N");
        assert_eq!(text(2, 1), "33°51'54\"S");
        assert_eq!(text(2, 2), "Sydney");
    }

    #[test]
    fn test_dm_reads_back() {
        let bytes = encode(&sample(), "Route", CoordinateFormat::DegreesMinutes).unwrap();
        let table = parse_workbook(&bytes).unwrap();
        assert!((table.waypoints[1].latitude + 33.865).abs() < 1e-6);
        assert!((table.waypoints[1].longitude - 151.2094).abs() < 1e-6);
    }

    #[test]
    fn test_header_row() {
        let sheet = worksheet_xml(&[], CoordinateFormat::Decimal).unwrap();
        let sheet = String::from_utf8(sheet).unwrap();
        assert!(sheet.contains(
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>Longitude</t></is></c><c r="B1" t="inlineStr"><is><t>Latitude</t></is></c><c r="C1" t="inlineStr"><is><t>Description</t></is></c></row>"#
        ));
    }

    #[test]
    fn test_sheet_name_rules() {
        assert_eq!(sheet_name("Leg 1/2 [draft]"), "Leg 1_2 _draft_");
        assert_eq!(sheet_name("'quoted'"), "quoted");
        assert_eq!(sheet_name(""), "Sheet1");
        assert_eq!(sheet_name(&"x".repeat(40)).chars().count(), MAX_SHEET_NAME_LEN);
    }
}
