//! `mm-match` — the per-trace matching pipeline.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`candidates`] | Per-ping candidate links, stop nodes, unmatchable report |
//! | [`waypoints`]  | Waypoint flags and the trial-waypoint chooser             |
//! | [`driver`]     | `MatchDriver` — the routing/evaluating/refining loop     |
//! | [`shape`]      | Path-geometry reconstruction and trimming                |
//! | [`quality`]    | Coverage test and match-quality scores                   |
//! | [`outcome`]    | `MatchOutcome`, `MatchedLink`, `MatchState`              |
//!
//! The pipeline for one conditioned trace: candidate selection biases the
//! routing costs and derives per-ping stop nodes; the driver stitches
//! shortest paths between waypoints, measures how many pings the path
//! covers, and inserts trial waypoints into the worst uncovered stretch
//! until the quality threshold is met or the waypoint budget runs out.

pub mod candidates;
pub mod driver;
pub mod outcome;
pub mod quality;
pub mod shape;
pub mod waypoints;


pub use candidates::{CandidateSet, PingMatch, PingPosition, UnmatchablePing, select_candidates};
pub use driver::MatchDriver;
pub use outcome::{MatchOutcome, MatchState, MatchedLink};
pub use waypoints::{WaypointFlag, add_waypoint};
