//! Projected-plane point and polyline arc-length operations.
//!
//! Everything here works in the metric working CRS (metres).  The matcher
//! uses these primitives in three places: exact point-to-link distances
//! behind the spatial index, trimming the reconstructed path at the first
//! and last covered pings, and the coverage test of the quality evaluator.

/// A point in the projected working CRS, metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct XyPoint {
    pub x: f64,
    pub y: f64,
}

impl XyPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: XyPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Squared distance from `p` to the segment `a`–`b`.
///
/// Squared to stay cheap inside R-tree pruning; take `sqrt` once at the end.
pub fn point_segment_distance_sq(p: XyPoint, a: XyPoint, b: XyPoint) -> f64 {
    let ab_x = b.x - a.x;
    let ab_y = b.y - a.y;

    let len_sq = ab_x * ab_x + ab_y * ab_y;
    if len_sq < 1e-12 {
        // Degenerate segment collapses to a point.
        return (p.x - a.x).powi(2) + (p.y - a.y).powi(2);
    }

    let t = (((p.x - a.x) * ab_x + (p.y - a.y) * ab_y) / len_sq).clamp(0.0, 1.0);
    let cx = a.x + t * ab_x;
    let cy = a.y + t * ab_y;
    (p.x - cx).powi(2) + (p.y - cy).powi(2)
}

/// An ordered sequence of projected vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    points: Vec<XyPoint>,
}

impl Polyline {
    pub fn new(points: Vec<XyPoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    #[inline]
    pub fn points(&self) -> &[XyPoint] {
        &self.points
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        // A lone vertex carries no length; treat it as empty geometry.
        self.points.len() < 2
    }

    /// Total arc length in metres.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum()
    }

    /// Reverse the vertex order (traversal in the `-1` direction).
    pub fn reversed(&self) -> Polyline {
        let mut points = self.points.clone();
        points.reverse();
        Polyline { points }
    }

    /// Minimum distance from `p` to any segment of the polyline.
    ///
    /// Returns `f64::INFINITY` for empty geometry, so "covered" tests fail
    /// closed.
    pub fn distance_to(&self, p: XyPoint) -> f64 {
        if self.is_empty() {
            return f64::INFINITY;
        }
        self.points
            .windows(2)
            .map(|w| point_segment_distance_sq(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min)
            .sqrt()
    }

    /// Arc length of the point on the polyline closest to `p`.
    ///
    /// The equivalent of shapely's `LineString.project`.
    pub fn project(&self, p: XyPoint) -> f64 {
        let mut best_sq = f64::INFINITY;
        let mut best_arc = 0.0;
        let mut walked = 0.0;

        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let seg_len = a.distance(b);

            let d_sq = point_segment_distance_sq(p, a, b);
            if d_sq < best_sq {
                best_sq = d_sq;
                // Recompute the clamped parameter for the winning segment.
                let t = if seg_len < 1e-9 {
                    0.0
                } else {
                    let ab_x = b.x - a.x;
                    let ab_y = b.y - a.y;
                    (((p.x - a.x) * ab_x + (p.y - a.y) * ab_y) / (seg_len * seg_len))
                        .clamp(0.0, 1.0)
                };
                best_arc = walked + t * seg_len;
            }
            walked += seg_len;
        }
        best_arc
    }

    /// Interpolated point at arc length `arc` (clamped to `[0, length]`).
    pub fn point_at(&self, arc: f64) -> Option<XyPoint> {
        if self.is_empty() {
            return None;
        }
        if arc <= 0.0 {
            return self.points.first().copied();
        }

        let mut remaining = arc;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let seg_len = a.distance(b);
            if remaining <= seg_len {
                let t = if seg_len < 1e-9 { 0.0 } else { remaining / seg_len };
                return Some(XyPoint {
                    x: a.x + t * (b.x - a.x),
                    y: a.y + t * (b.y - a.y),
                });
            }
            remaining -= seg_len;
        }
        self.points.last().copied()
    }

    /// The sub-polyline between arc lengths `from` and `to`.
    ///
    /// The equivalent of shapely's `substring` for `0 <= from <= to`.
    /// Returns empty geometry when the window has no extent, so callers can
    /// discard zero-length trims.
    pub fn substring(&self, from: f64, to: f64) -> Polyline {
        if self.is_empty() {
            return Polyline::empty();
        }
        let total = self.length();
        let from = from.clamp(0.0, total);
        let to = to.clamp(0.0, total);
        if to - from < 1e-9 {
            return Polyline::empty();
        }

        let mut out: Vec<XyPoint> = Vec::new();
        let Some(start) = self.point_at(from) else {
            return Polyline::empty();
        };
        out.push(start);

        let mut walked = 0.0;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let seg_len = a.distance(b);
            let seg_end = walked + seg_len;
            // Interior vertices strictly inside the window.
            if seg_end > from && seg_end < to {
                out.push(b);
            }
            walked = seg_end;
        }

        if let Some(end) = self.point_at(to) {
            if out.last() != Some(&end) {
                out.push(end);
            }
        }
        Polyline::new(out)
    }

    /// Append another polyline's vertices, skipping a duplicated joint.
    pub fn extend_with(&mut self, other: &Polyline) {
        for &p in other.points() {
            if self.points.last() != Some(&p) {
                self.points.push(p);
            }
        }
    }
}
