//! Compass bearings and the heading-alignment predicate.
//!
//! All bearings are initial great-circle bearings in degrees, normalized to
//! `[0, 360)`, computed on geographic coordinates regardless of the working
//! metric CRS.

use crate::geo::GeoPoint;

/// Initial compass bearing from `from` to `to`, degrees in `[0, 360)`.
pub fn compass_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let x = d_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    (x.atan2(y).to_degrees() + 360.0) % 360.0
}

/// Per-ping tangent bearings for an ordered trace.
///
/// Produces one value per point: the bearing from point `i` to point `i+1`,
/// with the final element replicating its predecessor so the vector stays
/// parallel to the trace.  A single-point trace gets a bearing of 0.
pub fn tangent_bearings(points: &[GeoPoint]) -> Vec<f64> {
    match points.len() {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let mut out = Vec::with_capacity(n);
            for pair in points.windows(2) {
                out.push(compass_bearing(pair[0], pair[1]));
            }
            out.push(out[n - 2]);
            out
        }
    }
}

/// Bearing of a polyline: from its first to its last geographic vertex.
///
/// Returns 0 for degenerate geometries with fewer than two vertices.
pub fn polyline_bearing(vertices: &[GeoPoint]) -> f64 {
    match (vertices.first(), vertices.last()) {
        (Some(&a), Some(&b)) if vertices.len() >= 2 => compass_bearing(a, b),
        _ => 0.0,
    }
}

/// Is a ping's tangent bearing consistent with a link's bearing, modulo
/// travel direction?
///
/// Accepts the direct match, the reverse (±180°) match — links may be
/// traversed either way — and the wrap-around complement near the 0/360
/// seam.  `tolerance` is in degrees (default 22.5 in [`crate::Parameters`]).
pub fn bearings_aligned(link_bearing: f64, ping_bearing: f64, tolerance: f64) -> bool {
    let diff = (link_bearing - ping_bearing).abs();
    diff <= tolerance
        || (diff >= 180.0 - tolerance && diff <= 180.0 + tolerance)
        || 360.0 - diff <= tolerance
}
