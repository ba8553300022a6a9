//! Route storage module
//!
//! This module provides the `Route` struct: one recorded path extracted from an archive,
//! named after that archive and stamped with the archive's capture time.

use crate::{Result, RouteError, ring};
use chrono::{DateTime, FixedOffset};
use geo::LineString;

/// Represents a single recorded path with its name and optional capture time
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Archive file name without its extension
    name: String,
    /// Capture time of the archive the route came from
    capture_time: Option<DateTime<FixedOffset>>,
    /// Traversal-ordered coordinates (lon, lat) in degrees
    geometry: LineString<f64>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Route {
    /// Create a new Route
    ///
    /// # Returns
    /// The route on success, or [`RouteError::EmptyRoute`] if the geometry has no coordinates
    pub fn new(
        name: impl Into<String>,
        capture_time: Option<DateTime<FixedOffset>>,
        geometry: LineString<f64>,
    ) -> Result<Self> {
        if geometry.0.is_empty() {
            return Err(RouteError::EmptyRoute);
        }

        Ok(Route {
            name: name.into(),
            capture_time,
            geometry,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn capture_time(&self) -> Option<DateTime<FixedOffset>> {
        self.capture_time
    }

    /// The geometry as recorded, in traversal order
    #[inline]
    pub fn geometry(&self) -> &LineString<f64> {
        &self.geometry
    }

    /// Display label: the name, prefixed with the `YYYYMMDD` capture date when known
    pub fn label(&self) -> String {
        match self.capture_time {
            Some(time) => format!("{} {}", time.format("%Y%m%d"), self.name),
            None => self.name.clone(),
        }
    }

    /// The geometry closed into a ring, ready to be used as a polygon boundary
    ///
    /// The stored geometry is left untouched.
    #[inline]
    pub fn boundary(&self) -> LineString<f64> {
        ring::close_ring(&self.geometry)
    }
}
