//! Match results.

use mm_core::{LinkId, Polyline, TraceId};

use crate::candidates::UnmatchablePing;

/// Terminal (and in-flight) state of the match driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum MatchState {
    #[default]
    Init,
    Routing,
    Evaluating,
    Refining,
    /// Quality threshold reached.
    Done,
    /// Data-quality rejection, waypoint budget exhausted, refinement
    /// exhausted, or cancellation.  The last computed result is still
    /// published.
    Failed,
}

/// One link of the reconstructed path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MatchedLink {
    pub link: LinkId,
    /// +1 when traversed a→b, −1 when b→a.
    pub direction: i8,
    /// Cumulative metres from the path start after traversing this link.
    pub milepost: f64,
}

/// Everything the driver publishes for one trace.
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub trace_id: TraceId,
    /// Reconstructed link sequence; may be a non-contiguous union of legs
    /// when individual legs were infeasible.
    pub links: Vec<MatchedLink>,
    pub state: MatchState,
    /// Covered fraction of the matchable pings, in [0, 1].
    pub match_quality: f64,
    /// Covered fraction of the whole conditioned trace, in [0, 1].
    pub match_quality_raw: f64,
    /// Trial waypoints inserted during refinement.
    pub waypoints_used: usize,
    /// Reconstructed path length over the summed trace segment distances.
    /// Values far from 1 flag reconstructions that shortcut or wander.
    pub distance_ratio: f64,
    /// Wall-clock seconds spent matching.
    pub match_secs: f64,
    /// Continuous path geometry in the working CRS, trimmed at both ends.
    pub path_shape: Polyline,
    /// Pings outside the buffer; populated only under
    /// `keep_ping_classification`.
    pub unmatchable: Vec<UnmatchablePing>,
    /// The trace's accumulated data-quality findings.
    pub errors: Vec<String>,
}

impl MatchOutcome {
    /// `true` iff the match reached the quality threshold.
    pub fn success(&self) -> bool {
        self.state == MatchState::Done
    }
}
