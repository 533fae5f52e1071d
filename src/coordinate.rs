use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::ConvertError;
use crate::waypoint_types::Axis;

type Result<T> = std::result::Result<T, ConvertError>;

// Patterns run against normalized (trimmed, uppercased, ASCII-primed) text.
// A missing symbol between two numbers must be replaced by whitespace.
static RE_DMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<deg>-?\d+)(?:\s*°\s*|\s+)(?P<min>\d+)(?:\s*'\s*|\s+)(?P<sec>\d+(?:\.\d+)?)\s*"?\s*(?P<dir>[NSEW])?$"#,
    )
    .expect("valid DMS regex")
});
static RE_DM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<deg>-?\d+)(?:\s*°\s*|\s+)(?P<min>\d+(?:\.\d+)?)\s*'?\s*(?P<dir>[NSEW])?$")
        .expect("valid DM regex")
});
static RE_HEMISPHERE_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<deg>-?\d+(?:\.\d+)?)\s*°?\s*(?P<dir>[NSEW])$")
        .expect("valid hemisphere decimal regex")
});

type Attempt = fn(&str) -> Option<f64>;

/// Tried in order; the first attempt that matches wins.
const ATTEMPTS: &[(&str, Attempt)] = &[
    ("decimal", parse_plain_decimal),
    ("dms", parse_dms),
    ("dm", parse_dm),
    ("hemisphere decimal", parse_hemisphere_decimal),
];

/// Parse a coordinate string into signed decimal degrees.
///
/// A leading `-` on the degrees wins over the direction letter, so
/// `-40°26'46"S` and `-40°26'46"N` are both negative.
pub fn parse_coordinate(raw: &str) -> Result<f64> {
    let normalized = normalize(raw);
    for (name, attempt) in ATTEMPTS {
        if let Some(value) = attempt(&normalized) {
            debug!(raw, pattern = *name, value, "parsed coordinate");
            return Ok(value);
        }
    }
    Err(ConvertError::invalid_coordinate(raw))
}

fn normalize(raw: &str) -> String {
    let mapped: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '′' | '＇' => '\'',
            '″' | '＂' => '"',
            'º' => '°',
            c => c,
        })
        .collect();
    mapped.to_uppercase().replace("''", "\"")
}

fn parse_plain_decimal(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_dms(s: &str) -> Option<f64> {
    RE_DMS.captures(s).and_then(|caps| sexagesimal(&caps))
}

fn parse_dm(s: &str) -> Option<f64> {
    RE_DM.captures(s).and_then(|caps| sexagesimal(&caps))
}

fn parse_hemisphere_decimal(s: &str) -> Option<f64> {
    RE_HEMISPHERE_DECIMAL
        .captures(s)
        .and_then(|caps| sexagesimal(&caps))
}

/// Combine `deg`, optional `min`/`sec` and optional `dir` captures.
fn sexagesimal(caps: &Captures<'_>) -> Option<f64> {
    let degrees_token = caps.name("deg")?.as_str();
    let degrees: f64 = degrees_token.parse().ok()?;
    let minutes = capture_or_zero(caps, "min")?;
    let seconds = capture_or_zero(caps, "sec")?;

    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    let negative = if degrees_token.starts_with('-') {
        true
    } else {
        matches!(caps.name("dir").map(|m| m.as_str()), Some("S" | "W"))
    };

    Some(if negative { -magnitude } else { magnitude })
}

fn capture_or_zero(caps: &Captures<'_>, name: &str) -> Option<f64> {
    match caps.name(name) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0.0),
    }
}

/// Fixed 4-decimal rendering used by all XML formats.
pub fn to_decimal(value: f64) -> String {
    format!("{value:.4}")
}

/// Degrees and decimal minutes, e.g. `40°26.7667'N`.
pub fn to_dm(value: f64, axis: Axis) -> String {
    let magnitude = value.abs();
    let degrees = magnitude.trunc();
    let minutes = (magnitude - degrees) * 60.0;
    format!(
        "{}°{:.4}'{}",
        degrees as u32,
        minutes,
        axis.hemisphere(value)
    )
}

/// Degrees, minutes and whole seconds, e.g. `40°26'46"N`.
///
/// Seconds are rounded after the split, so a value just below a whole
/// minute renders as `60` seconds rather than carrying into the minutes.
pub fn to_dms(value: f64, axis: Axis) -> String {
    let total_seconds = value.abs() * 3600.0;
    let total_minutes = (total_seconds / 60.0).floor();
    let seconds = total_seconds - total_minutes * 60.0;
    let degrees = (total_minutes / 60.0).floor();
    let minutes = total_minutes - degrees * 60.0;
    format!(
        "{}°{}'{:.0}\"{}",
        degrees as u32,
        minutes as u32,
        seconds,
        axis.hemisphere(value)
    )
}
