//! Lenient KML parsing
//!
//! Extracts every `LineString` nested in a `Placemark` together with the document's capture
//! time. Parsing is lenient at the smallest possible scope: a bad coordinate token drops only
//! that token, a bad timestamp only clears the capture time. Both are collected as issues for
//! the caller to report. Only a document that is not well-formed XML fails as a whole.

use crate::{Result, RouteError};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use geo::{Coord, LineString};
use xml::reader::{EventReader, ParserConfig, XmlEvent};

/// Result of parsing one KML document
#[derive(Debug, Default)]
pub struct ParsedMarkup {
    /// Capture time shared by every geometry of the document
    pub capture_time: Option<DateTime<FixedOffset>>,
    /// Non-empty geometries in document order
    pub geometries: Vec<LineString<f64>>,
    /// Recoverable problems found while parsing (dropped tokens, unparseable timestamps)
    pub issues: Vec<RouteError>,
}

/// Which text node is currently being captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Coordinates,
    When,
    Begin,
}

/// Parse raw KML bytes into geometries and an optional capture time
///
/// # Errors
/// Returns [`RouteError::MalformedMarkup`] if the document is not well-formed XML. Nothing
/// parsed before the error is returned in that case.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_markup(data: &[u8]) -> Result<ParsedMarkup> {
    let config = ParserConfig::new()
        .trim_whitespace(false)
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .ignore_comments(true);
    let reader = EventReader::new_with_config(data, config);

    let mut parsed = ParsedMarkup::default();
    // Local names of the currently open elements
    let mut stack: Vec<String> = Vec::new();
    // Depth of the innermost open LineString and whether its coordinates were already taken
    let mut line_string: Option<(usize, bool)> = None;
    let mut placemark_depth = 0usize;
    // Text node being captured, with the depth of the element that owns it
    let mut capture: Option<(Capture, usize, String)> = None;
    let mut first_when: Option<String> = None;
    let mut first_begin: Option<String> = None;

    for event in reader {
        match event? {
            XmlEvent::StartElement { name, .. } => {
                let local = name.local_name;
                let kind = match (stack.last().map(String::as_str), local.as_str()) {
                    (Some("LineString"), "coordinates") => match line_string {
                        Some((depth, false)) if depth == stack.len() && placemark_depth > 0 => {
                            line_string = Some((depth, true));
                            Some(Capture::Coordinates)
                        }
                        _ => None,
                    },
                    (Some("TimeStamp"), "when") if first_when.is_none() => Some(Capture::When),
                    (Some("TimeSpan"), "begin") if first_begin.is_none() => Some(Capture::Begin),
                    _ => None,
                };
                match local.as_str() {
                    "Placemark" => placemark_depth += 1,
                    "LineString" => line_string = Some((stack.len() + 1, false)),
                    _ => {}
                }
                stack.push(local);
                if capture.is_none() {
                    capture = kind.map(|kind| (kind, stack.len(), String::new()));
                }
            }
            XmlEvent::Characters(text) => {
                if let Some((_, _, buffer)) = capture.as_mut() {
                    buffer.push_str(&text);
                }
            }
            XmlEvent::EndElement { .. } => {
                let depth = stack.len();
                let Some(local) = stack.pop() else {
                    continue;
                };
                if let Some((kind, _, buffer)) = capture.take_if(|(_, d, _)| *d == depth) {
                    match kind {
                        Capture::Coordinates => {
                            let (geometry, issues) = parse_coordinates(&buffer);
                            parsed.issues.extend(issues);
                            if !geometry.0.is_empty() {
                                parsed.geometries.push(geometry);
                            }
                        }
                        Capture::When => first_when = Some(buffer),
                        Capture::Begin => first_begin = Some(buffer),
                    }
                }
                match local.as_str() {
                    "Placemark" => placemark_depth = placemark_depth.saturating_sub(1),
                    "LineString" if matches!(line_string, Some((d, _)) if d == depth) => {
                        line_string = None;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    if let Some(value) = first_when.or(first_begin) {
        match parse_timestamp(&value) {
            Ok(time) => parsed.capture_time = Some(time),
            Err(issue) => parsed.issues.push(issue),
        }
    }

    Ok(parsed)
}

/// Parse a single `lon,lat[,alt]` token
///
/// Altitude and any further components are ignored. Longitude and latitude must be finite.
#[inline]
pub fn parse_coordinate_token(token: &str) -> Result<Coord<f64>> {
    let malformed = || RouteError::MalformedCoordinateToken {
        token: token.to_string(),
    };
    let mut parts = token.split(',');
    let (Some(lon), Some(lat)) = (parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let x = lon.trim().parse::<f64>().map_err(|_| malformed())?;
    let y = lat.trim().parse::<f64>().map_err(|_| malformed())?;
    // Degrees are finite; NaN and overflowing values never make a usable vertex
    if !x.is_finite() || !y.is_finite() {
        return Err(malformed());
    }
    Ok(Coord { x, y })
}

/// Parse a whitespace-separated KML coordinate list
///
/// Returns the geometry built from every valid token, in order, and one issue per dropped
/// token. The geometry may be empty.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_coordinates(text: &str) -> (LineString<f64>, Vec<RouteError>) {
    let (coords, issues): (Vec<_>, Vec<_>) = text
        .split_whitespace()
        .map(parse_coordinate_token)
        .partition(|result| result.is_ok());

    let coords: Vec<Coord<f64>> = coords.into_iter().filter_map(|c| c.ok()).collect();
    let issues = issues.into_iter().filter_map(|e| e.err()).collect();
    (LineString::new(coords), issues)
}

/// Parse an ISO-8601 timestamp as found in `<when>` / `<begin>`
///
/// A trailing `Z` designator is read as `+00:00`. Values without an offset are taken as UTC,
/// plain dates as midnight UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = value.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    let rfc3339_error = match DateTime::parse_from_rfc3339(&normalized) {
        Ok(time) => return Ok(time),
        Err(e) => e,
    };
    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(time) = DateTime::parse_from_str(&normalized, format) {
            return Ok(time);
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc().fixed_offset());
    }

    Err(RouteError::MalformedTimestamp {
        value: trimmed.to_string(),
        reason: rfc3339_error.to_string(),
    })
}
