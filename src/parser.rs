use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::coordinate::parse_coordinate;
use crate::error::ConvertError;
use crate::waypoint_types::{Waypoint, WaypointTable};

type Result<T> = std::result::Result<T, ConvertError>;

/// Parse a KML document into a WaypointTable, one waypoint per Placemark.
///
/// Elements are matched by local name, so both the KML 2.2 namespace and
/// unprefixed documents are accepted.
pub fn parse_kml(xml: &[u8], route_name: &str) -> Result<WaypointTable> {
    let mut reader = Reader::from_reader(xml);
    let mut waypoints = Vec::new();
    let mut skipped = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"Placemark" => {
                match parse_placemark(&mut reader)? {
                    Some(wpt) => waypoints.push(wpt),
                    None => skipped += 1,
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    if skipped > 0 {
        warn!(skipped, "placemarks without coordinates were skipped");
    }
    debug!(count = waypoints.len(), route_name, "decoded KML placemarks");

    Ok(WaypointTable::new(route_name, waypoints))
}

/// Parse the children of a <Placemark>.
/// Called after receiving Event::Start for the placemark.
fn parse_placemark<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Option<Waypoint>> {
    let mut name: Option<String> = None;
    let mut coordinates: Option<String> = None;
    // Depth below the placemark; only a direct <name> child names the waypoint.
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" if depth == 0 => name = Some(read_text_owned(reader, &e)?),
                b"coordinates" => {
                    let text = read_text_owned(reader, &e)?;
                    coordinates.get_or_insert(text);
                }
                _ => depth += 1,
            },
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    let Some(coordinates) = coordinates else {
        return Ok(None);
    };
    let (longitude, latitude) = parse_lon_lat(&coordinates)?;
    let description = name.map(|n| n.trim().to_string()).unwrap_or_default();

    Ok(Some(Waypoint::new(latitude, longitude, description)))
}

/// Split KML `lon,lat[,alt]` text. Only the first tuple is used when the
/// geometry carries several.
fn parse_lon_lat(text: &str) -> Result<(f64, f64)> {
    let mut tokens = text.split(',');
    match (tokens.next(), tokens.next()) {
        (Some(lon), Some(lat)) => Ok((parse_coordinate(lon)?, parse_coordinate(lat)?)),
        _ => Err(ConvertError::invalid_coordinate(text.trim())),
    }
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references (Event::GeneralRef).
/// Text is decoded with the encoding named in the XML declaration.
fn read_text_owned<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'_>,
) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                text.push_str(&reader.decoder().decode(e.as_ref())?);
            }
            Ok(Event::CData(e)) => {
                text.push_str(&reader.decoder().decode(e.as_ref())?);
            }
            Ok(Event::GeneralRef(e)) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    let name = reader.decoder().decode(e.as_ref())?;
                    match name.as_ref() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(text)
}
