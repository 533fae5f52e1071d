use quick_xml::events::BytesStart;

use super::XmlDocument;
use crate::coordinate::to_decimal;
use crate::error::ConvertError;
use crate::waypoint_types::Waypoint;

pub const NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

const CREATOR: &str = env!("CARGO_PKG_NAME");

pub fn encode(waypoints: &[Waypoint], route_name: &str) -> Result<Vec<u8>, ConvertError> {
    let mut doc = XmlDocument::pretty(Some("no"))?;
    doc.open(BytesStart::new("gpx").with_attributes([
        ("version", "1.1"),
        ("creator", CREATOR),
        ("xmlns", NAMESPACE),
    ]))?;
    doc.open_tag("rte")?;
    doc.leaf("name", route_name)?;

    for wpt in waypoints {
        let lat = to_decimal(wpt.latitude);
        let lon = to_decimal(wpt.longitude);
        doc.open(
            BytesStart::new("rtept").with_attributes([("lat", lat.as_str()), ("lon", lon.as_str())]),
        )?;
        doc.leaf("name", &wpt.description)?;
        doc.close("rtept")?;
    }

    doc.close("rte")?;
    doc.close("gpx")?;
    Ok(doc.finish())
}
