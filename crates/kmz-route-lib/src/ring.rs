//! Ring closing for polygon fill

use geo::{Coord, LineString};

/// Per-axis tolerance in degrees under which two coordinates are considered equal
pub const RING_TOLERANCE: f64 = 1e-6;

/// Check whether two coordinates match within [`RING_TOLERANCE`] on both axes
///
/// Only a difference known to exceed the tolerance counts as a mismatch, so a NaN axis
/// matches and closing stays idempotent.
#[inline(always)]
pub fn coords_match(a: Coord<f64>, b: Coord<f64>) -> bool {
    let exceeds = |delta: f64| delta.abs() > RING_TOLERANCE;
    !exceeds(a.x - b.x) && !exceeds(a.y - b.y)
}

/// Check whether a geometry already forms a closed ring within tolerance
///
/// Empty geometries are considered closed.
#[inline]
pub fn is_closed(line: &LineString<f64>) -> bool {
    match (line.0.first(), line.0.last()) {
        (Some(&first), Some(&last)) => coords_match(first, last),
        _ => true,
    }
}

/// Return a closed copy of the geometry
///
/// Appends the first coordinate when the ends differ by more than [`RING_TOLERANCE`],
/// otherwise returns an identical copy. The input is never modified, and applying this twice
/// yields the same ring as applying it once.
pub fn close_ring(line: &LineString<f64>) -> LineString<f64> {
    let mut ring = line.clone();
    if !is_closed(line) {
        ring.0.push(line.0[0]);
    }
    ring
}
