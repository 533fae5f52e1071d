use chrono::{DateTime, Utc};
use quick_xml::events::BytesStart;

use super::XmlDocument;
use crate::coordinate::to_decimal;
use crate::error::ConvertError;
use crate::waypoint_types::Waypoint;

pub const NAMESPACE: &str = "http://www8.garmin.com/xmlschemas/FlightPlan/v1";

const WAYPOINT_TYPE: &str = "USER WAYPOINT";

/// Encode waypoints as a flight plan whose single route visits every
/// waypoint in order. The description is used as both identifier and comment.
pub fn encode(
    waypoints: &[Waypoint],
    route_name: &str,
    created: DateTime<Utc>,
) -> Result<Vec<u8>, ConvertError> {
    let mut doc = XmlDocument::pretty(Some("yes"))?;
    doc.open(BytesStart::new("flight-plan").with_attributes([("xmlns", NAMESPACE)]))?;
    doc.leaf("created", &created.format("%Y-%m-%d %H:%M:%S").to_string())?;

    doc.open_tag("waypoint-table")?;
    for wpt in waypoints {
        doc.open_tag("waypoint")?;
        doc.leaf("identifier", &wpt.description)?;
        doc.leaf("type", WAYPOINT_TYPE)?;
        doc.leaf("lat", &to_decimal(wpt.latitude))?;
        doc.leaf("lon", &to_decimal(wpt.longitude))?;
        doc.leaf("comment", &wpt.description)?;
        doc.close("waypoint")?;
    }
    doc.close("waypoint-table")?;

    doc.open_tag("route")?;
    doc.leaf("route-name", route_name)?;
    doc.leaf("flight-plan-index", "1")?;
    for wpt in waypoints {
        doc.open_tag("route-point")?;
        doc.leaf("waypoint-identifier", &wpt.description)?;
        doc.leaf("waypoint-type", WAYPOINT_TYPE)?;
        doc.close("route-point")?;
    }
    doc.close("route")?;

    doc.close("flight-plan")?;
    Ok(doc.finish())
}
