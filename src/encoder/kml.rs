use quick_xml::events::BytesStart;

use super::XmlDocument;
use crate::coordinate::to_decimal;
use crate::error::ConvertError;
use crate::waypoint_types::Waypoint;

pub const NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

pub fn encode(waypoints: &[Waypoint], route_name: &str) -> Result<Vec<u8>, ConvertError> {
    let mut doc = XmlDocument::pretty(None)?;
    doc.open(BytesStart::new("kml").with_attributes([("xmlns", NAMESPACE)]))?;
    doc.open_tag("Document")?;
    doc.leaf("name", route_name)?;

    for wpt in waypoints {
        doc.open_tag("Placemark")?;
        doc.leaf("name", &wpt.description)?;
        doc.open_tag("Point")?;
        doc.leaf("coordinates", &point_coordinates(wpt))?;
        doc.close("Point")?;
        doc.close("Placemark")?;
    }

    doc.close("Document")?;
    doc.close("kml")?;
    Ok(doc.finish())
}

/// KML orders coordinates lon,lat,altitude.
fn point_coordinates(wpt: &Waypoint) -> String {
    format!("{},{},0", to_decimal(wpt.longitude), to_decimal(wpt.latitude))
}
