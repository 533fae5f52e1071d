use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::chunker::chunk;
use crate::encoder::encode_chunk;
use crate::error::ConvertError;
use crate::options::ConvertOptions;
use crate::parser::parse_kml;
use crate::spreadsheet::parse_workbook;
use crate::waypoint_types::WaypointTable;

type Result<T> = std::result::Result<T, ConvertError>;

/// Kind of uploaded document, decided by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Spreadsheet,
    Kml,
}

impl InputKind {
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => Ok(Self::Spreadsheet),
            Some("kml") => Ok(Self::Kml),
            _ => Err(ConvertError::UnsupportedInputType {
                file_name: file_name.to_string(),
            }),
        }
    }
}

/// One downloadable document.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// File name without directory or extension.
pub fn base_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Decode an uploaded file into a WaypointTable.
pub fn load_table(file_name: &str, bytes: &[u8]) -> Result<WaypointTable> {
    let kind = InputKind::from_file_name(file_name)?;
    info!(file_name, ?kind, size = bytes.len(), "loading waypoint input");
    match kind {
        InputKind::Spreadsheet => parse_workbook(bytes),
        InputKind::Kml => parse_kml(bytes, base_name(file_name)),
    }
}

/// Convert an uploaded file into one or more output documents.
///
/// The whole input is decoded before anything is encoded, so an invalid
/// row or placemark produces an error and no documents.
pub fn convert(
    file_name: &str,
    bytes: &[u8],
    opts: &ConvertOptions,
    created: DateTime<Utc>,
) -> Result<Vec<OutputFile>> {
    let table = load_table(file_name, bytes)?;
    convert_table(&table, base_name(file_name), opts, created)
}

/// Chunk a decoded table and encode each chunk. Output files are named
/// after `base_name`, with `_2`, `_3`, ... on every chunk after the first.
pub fn convert_table(
    table: &WaypointTable,
    base_name: &str,
    opts: &ConvertOptions,
    created: DateTime<Utc>,
) -> Result<Vec<OutputFile>> {
    let format = opts.format;
    let chunks = chunk(table, format.chunk_limit(table.len()));
    info!(
        waypoints = table.len(),
        chunks = chunks.len(),
        ?format,
        "encoding waypoint table"
    );

    chunks
        .iter()
        .map(|c| {
            let doc = encode_chunk(
                format,
                c.waypoints,
                &table.route_name,
                opts.coordinate_format,
                created,
            )?;
            Ok(OutputFile {
                file_name: c.file_name(base_name, doc.extension),
                mime_type: doc.mime_type,
                data: doc.bytes,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OutputFormat;
    use crate::waypoint_types::Waypoint;

    fn table(n: usize) -> WaypointTable {
        let waypoints = (0..n)
            .map(|i| Waypoint::new(45.0, i as f64 / 100.0, format!("P{i}")))
            .collect();
        WaypointTable::new("Sheet1", waypoints)
    }

    #[test]
    fn test_input_kind() {
        assert_eq!(InputKind::from_file_name("a.xlsx").unwrap(), InputKind::Spreadsheet);
        assert_eq!(InputKind::from_file_name("a.XLS").unwrap(), InputKind::Spreadsheet);
        assert_eq!(InputKind::from_file_name("dir/route.kml").unwrap(), InputKind::Kml);
        for name in ["notes.txt", "waypoints.csv", "noextension"] {
            assert!(matches!(
                InputKind::from_file_name(name),
                Err(ConvertError::UnsupportedInputType { file_name }) if file_name == name
            ));
        }
    }

    #[test]
    fn test_unsupported_input_rejected_before_parsing() {
        // Valid KML bytes, but the name decides
        let err = load_table("route.txt", b"<kml/>").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedInputType { .. }));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("waypoints.xlsx"), "waypoints");
        assert_eq!(base_name("my.route.kml"), "my.route");
        assert_eq!(base_name("nested/dir/trip.kml"), "trip");
    }

    #[test]
    fn test_flight_plan_chunks_named() {
        let opts = ConvertOptions::default();
        let files = convert_table(&table(150), "base", &opts, Utc::now()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["base.fpl", "base_2.fpl"]);
        assert!(files.iter().all(|f| f.mime_type == "application/xml"));

        let second = String::from_utf8(files[1].data.clone()).unwrap();
        assert_eq!(second.matches("<waypoint>").count(), 51);
        assert!(second.contains("<identifier>P99</identifier>"));
        assert!(second.contains("<route-name>Sheet1</route-name>"));
    }

    #[test]
    fn test_other_formats_single_file() {
        for format in [OutputFormat::Kml, OutputFormat::Gpx, OutputFormat::Spreadsheet] {
            let opts = ConvertOptions {
                format,
                ..Default::default()
            };
            let files = convert_table(&table(150), "base", &opts, Utc::now()).unwrap();
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].file_name, format!("base{}", format.extension()));
            assert_eq!(files[0].mime_type, format.mime_type());
        }
    }

    #[test]
    fn test_empty_table_has_no_output() {
        let files =
            convert_table(&table(0), "base", &ConvertOptions::default(), Utc::now()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_kml_route_named_after_file() {
        let kml = br#"<kml><Placemark><name>A</name><Point><coordinates>1,2</coordinates></Point></Placemark></kml>"#;
        let opts = ConvertOptions {
            format: OutputFormat::Gpx,
            ..Default::default()
        };
        let files = convert("summer trip.kml", kml, &opts, Utc::now()).unwrap();
        assert_eq!(files[0].file_name, "summer trip.gpx");
        let gpx = String::from_utf8(files[0].data.clone()).unwrap();
        assert!(gpx.contains("<name>summer trip</name>"));
    }

    #[test]
    fn test_invalid_coordinate_produces_no_output() {
        let kml = br#"<kml>
  <Placemark><name>ok</name><Point><coordinates>1,2</coordinates></Point></Placemark>
  <Placemark><name>bad</name><Point><coordinates>1,north</coordinates></Point></Placemark>
</kml>"#;
        let err = convert("r.kml", kml, &ConvertOptions::default(), Utc::now()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidCoordinateFormat { value } if value == "north"));
    }
}
