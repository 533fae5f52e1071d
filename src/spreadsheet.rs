use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use tracing::{debug, info};

use crate::coordinate::parse_coordinate;
use crate::error::ConvertError;
use crate::waypoint_types::{REQUIRED_COLUMNS, Waypoint, WaypointTable};

type Result<T> = std::result::Result<T, ConvertError>;

/// Read the first sheet of a workbook (xlsx, xlsm, xlsb, xls or ods).
/// The sheet name becomes the route name.
pub fn parse_workbook(bytes: &[u8]) -> Result<WaypointTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_name = workbook
        .sheet_names()
        .into_iter()
        .next()
        .ok_or(ConvertError::EmptyWorkbook)?;
    info!(sheet = %sheet_name, "reading first sheet");

    let range = workbook.worksheet_range(&sheet_name)?;
    table_from_range(&sheet_name, &range)
}

/// Positions of the required columns in the header row.
struct ColumnIndices {
    longitude: usize,
    latitude: usize,
    description: usize,
}

impl ColumnIndices {
    fn from_header(header: &[Data]) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| matches!(cell, Data::String(s) if s == name))
        };
        match (find("Longitude"), find("Latitude"), find("Description")) {
            (Some(longitude), Some(latitude), Some(description)) => Ok(Self {
                longitude,
                latitude,
                description,
            }),
            _ => Err(ConvertError::MissingColumns {
                columns: REQUIRED_COLUMNS,
            }),
        }
    }
}

/// Build a table from a sheet's used range. Rows with an empty required
/// cell are dropped before any coordinate is parsed.
pub fn table_from_range(sheet_name: &str, range: &Range<Data>) -> Result<WaypointTable> {
    let mut rows = range.rows();
    let header = rows.next().unwrap_or_default();
    let columns = ColumnIndices::from_header(header)?;

    let mut waypoints = Vec::new();
    let mut dropped = 0usize;

    for row in rows {
        let (Some(lon), Some(lat), Some(desc)) = (
            cell_text(row, columns.longitude),
            cell_text(row, columns.latitude),
            cell_text(row, columns.description),
        ) else {
            dropped += 1;
            continue;
        };

        waypoints.push(Waypoint::new(
            parse_coordinate(&lat)?,
            parse_coordinate(&lon)?,
            desc,
        ));
    }

    debug!(kept = waypoints.len(), dropped, "decoded spreadsheet rows");

    Ok(WaypointTable::new(sheet_name, waypoints))
}

/// Display text of a cell, or None when the cell is empty or blank.
fn cell_text(row: &[Data], index: usize) -> Option<String> {
    match row.get(index)? {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        cell => Some(cell.to_string()),
    }
}
