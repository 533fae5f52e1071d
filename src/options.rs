use serde::Deserialize;

/// Maximum number of waypoints a Garmin flight plan accepts.
pub const FLIGHT_PLAN_MAX_WAYPOINTS: usize = 99;

/// Options for a waypoint conversion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Output document format (default: fpl)
    #[serde(default)]
    pub format: OutputFormat,

    /// How coordinates are written into spreadsheet output (default: decimal)
    #[serde(default)]
    pub coordinate_format: CoordinateFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "fpl")]
    FlightPlan,
    #[serde(rename = "kml")]
    Kml,
    #[serde(rename = "gpx")]
    Gpx,
    #[serde(rename = "xlsx")]
    Spreadsheet,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::FlightPlan => ".fpl",
            Self::Kml => ".kml",
            Self::Gpx => ".gpx",
            Self::Spreadsheet => ".xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::FlightPlan => "application/xml",
            Self::Kml => "application/vnd.google-earth.kml+xml",
            Self::Gpx => "application/gpx+xml",
            Self::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Largest chunk this format accepts for a table of `table_len` waypoints.
    pub fn chunk_limit(self, table_len: usize) -> usize {
        match self {
            Self::FlightPlan => FLIGHT_PLAN_MAX_WAYPOINTS,
            _ => table_len,
        }
    }
}

/// Coordinate rendering for spreadsheet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum CoordinateFormat {
    #[default]
    #[serde(rename = "decimal")]
    Decimal,
    #[serde(rename = "dm")]
    DegreesMinutes,
    #[serde(rename = "dms")]
    DegreesMinutesSeconds,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let opts: ConvertOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.format, OutputFormat::FlightPlan);
        assert_eq!(opts.coordinate_format, CoordinateFormat::Decimal);
    }

    #[test]
    fn test_camel_case_fields() {
        let opts: ConvertOptions =
            serde_json::from_str(r#"{"format":"xlsx","coordinateFormat":"dms"}"#).unwrap();
        assert_eq!(opts.format, OutputFormat::Spreadsheet);
        assert_eq!(opts.coordinate_format, CoordinateFormat::DegreesMinutesSeconds);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(serde_json::from_str::<ConvertOptions>(r#"{"format":"csv"}"#).is_err());
    }

    #[test]
    fn test_chunk_limits() {
        assert_eq!(OutputFormat::FlightPlan.chunk_limit(150), 99);
        assert_eq!(OutputFormat::Kml.chunk_limit(150), 150);
        assert_eq!(OutputFormat::Gpx.chunk_limit(150), 150);
        assert_eq!(OutputFormat::Spreadsheet.chunk_limit(150), 150);
    }
}
