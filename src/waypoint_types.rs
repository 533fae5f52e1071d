use serde::Serialize;

/// Column names a tabular input must provide, in output column order.
pub const REQUIRED_COLUMNS: &[&str] = &["Longitude", "Latitude", "Description"];

/// A single waypoint in decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64, description: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            description: description.into(),
        }
    }
}

/// Decoded waypoints in input order, plus the route name taken from the
/// sheet name (spreadsheets) or the file name (KML).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointTable {
    pub route_name: String,
    pub waypoints: Vec<Waypoint>,
}

impl WaypointTable {
    pub fn new(route_name: impl Into<String>, waypoints: Vec<Waypoint>) -> Self {
        Self {
            route_name: route_name.into(),
            waypoints,
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Which hemisphere letters a coordinate is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Direction letter for a signed value on this axis.
    pub fn hemisphere(self, value: f64) -> char {
        match (self, value < 0.0) {
            (Axis::Latitude, false) => 'N',
            (Axis::Latitude, true) => 'S',
            (Axis::Longitude, false) => 'E',
            (Axis::Longitude, true) => 'W',
        }
    }
}
