//! Ping and trace types.

use mm_core::{GeoPoint, PingId, TraceId, XyPoint};

/// One GPS observation as it arrives from the input, before conditioning.
#[derive(Copy, Clone, Debug)]
pub struct RawPing {
    pub trace_id: TraceId,
    /// Unix seconds.
    pub timestamp: i64,
    pub geo: GeoPoint,
}

/// A conditioned GPS observation with its derived per-segment fields.
#[derive(Copy, Clone, Debug)]
pub struct Ping {
    /// 1-based, contiguous within the conditioned trace.
    pub ping_id: PingId,
    /// Unix seconds; strictly increasing within the trace.
    pub timestamp: i64,
    pub geo: GeoPoint,
    /// Position in the working metric CRS.
    pub xy: XyPoint,
    /// Degrees in [0, 360); the last ping replicates its predecessor.
    pub tangent_bearing: f64,
    /// Metres from the previous ping (0 for the first).
    pub segment_dist: f64,
    /// Seconds since the previous ping (0 for the first).
    pub segment_secs: f64,
    /// m/s over the incoming segment; 0 for the first ping, −1 when
    /// undefined.
    pub segment_speed: f64,
}

/// An ordered, conditioned ping sequence sharing one trace id.
///
/// Created by [`condition`](crate::condition); read-only afterwards except
/// for the error list, which later pipeline stages may extend with further
/// data-quality findings.
#[derive(Debug)]
pub struct Trace {
    pub trace_id: TraceId,
    pings: Vec<Ping>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Trace {
    pub(crate) fn new(
        trace_id: TraceId,
        pings: Vec<Ping>,
        errors: Vec<String>,
        warnings: Vec<String>,
    ) -> Self {
        Self { trace_id, pings, errors, warnings }
    }

    pub fn pings(&self) -> &[Ping] {
        &self.pings
    }

    pub fn len(&self) -> usize {
        self.pings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pings.is_empty()
    }

    /// The trace is unsuitable for matching iff any error accumulated.
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Record a further data-quality finding (candidate selection does this
    /// for "too few pings within buffer" and the degenerate case).
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Diagonal of the projected bounding box, metres.
    pub fn coverage(&self) -> f64 {
        if self.pings.is_empty() {
            return 0.0;
        }
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &self.pings {
            min_x = min_x.min(p.xy.x);
            min_y = min_y.min(p.xy.y);
            max_x = max_x.max(p.xy.x);
            max_y = max_y.max(p.xy.y);
        }
        ((max_x - min_x).powi(2) + (max_y - min_y).powi(2)).sqrt()
    }

    /// Total trace length as the sum of segment distances, metres.
    pub fn travelled_dist(&self) -> f64 {
        self.pings.iter().map(|p| p.segment_dist).sum()
    }
}
