//! Per-ping candidate links, stop nodes, and the unmatchable report.
//!
//! For every conditioned ping: query the spatial index within the buffer,
//! drop candidates whose bearing disagrees with the ping's tangent bearing,
//! optionally drop links whose speed cap the ping exceeds, and keep the
//! closest survivor as the **primary candidate**.  Primary candidates feed
//! the cost discount; their endpoints, oriented against the tangent
//! bearing, become the per-ping stop nodes the driver routes through.

use rustc_hash::FxHashSet;

use mm_core::{LinkIdx, NodeId, Parameters, PingId, XyPoint, bearings_aligned};
use mm_spatial::Network;
use mm_trace::Trace;

use crate::waypoints::WaypointFlag;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Where an unmatchable ping sits relative to the matched ping range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PingPosition {
    BeforeStart,
    Middle,
    AfterEnd,
}

impl PingPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            PingPosition::BeforeStart => "before start",
            PingPosition::Middle => "middle",
            PingPosition::AfterEnd => "after end",
        }
    }
}

/// A ping farther than the buffer from every usable link, carried
/// out-of-band: it never enters the waypoint list.
#[derive(Copy, Clone, Debug)]
pub struct UnmatchablePing {
    pub ping_id: PingId,
    pub timestamp: i64,
    pub position: PingPosition,
}

/// Candidate/waypoint state of one matchable ping — the second of the two
/// parallel arrays (geometry/timing lives on the [`Trace`]).
#[derive(Copy, Clone, Debug)]
pub struct PingMatch {
    pub ping_id: PingId,
    pub timestamp: i64,
    pub xy: XyPoint,
    pub tangent_bearing: f64,
    /// Primary candidate link.
    pub link: LinkIdx,
    /// Perpendicular distance to the primary candidate, metres.
    pub dist_to_link: f64,
    /// Graph node used when this ping is routed through.
    pub stop_node: NodeId,
    pub flag: WaypointFlag,
    /// Set by the quality evaluator after each routing attempt.
    pub covered: bool,
}

/// Everything candidate selection derives for one trace.
#[derive(Debug, Default)]
pub struct CandidateSet {
    /// Matchable pings in ping order.
    pub matches: Vec<PingMatch>,
    /// Deduplicated primary-candidate links; the cost-discount set.
    pub links: Vec<LinkIdx>,
    /// Pings outside the buffer, classified by position.
    pub unmatchable: Vec<UnmatchablePing>,
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// Run candidate selection for a conditioned trace.
///
/// Appends "too few pings within buffer" / "degenerate" findings to the
/// trace's error list; the returned set is still usable under
/// `ignore_errors` as long as any pings matched.
pub fn select_candidates(network: &Network, trace: &mut Trace, params: &Parameters) -> CandidateSet {
    let mm = &params.map_matching;
    let buffer = mm.buffer_size;

    let mut matches: Vec<PingMatch> = Vec::with_capacity(trace.len());
    let mut outside: Vec<(PingId, i64)> = Vec::new();

    for ping in trace.pings() {
        let primary = network
            .nearest_links(ping.xy, buffer)
            .into_iter()
            .find(|&(link, _)| {
                if !bearings_aligned(
                    network.link_bearing(link),
                    ping.tangent_bearing,
                    mm.heading_tolerance,
                ) {
                    return false;
                }
                // A ping moving faster than the link allows is not on it.
                match network.speed_cap(link) {
                    Some(cap) => ping.segment_speed <= cap,
                    None => true,
                }
            });

        match primary {
            Some((link, dist)) => matches.push(PingMatch {
                ping_id: ping.ping_id,
                timestamp: ping.timestamp,
                xy: ping.xy,
                tangent_bearing: ping.tangent_bearing,
                link,
                dist_to_link: dist,
                stop_node: NodeId::INVALID,
                flag: WaypointFlag::None,
                covered: false,
            }),
            None => outside.push((ping.ping_id, ping.timestamp)),
        }
    }

    let unmatchable = classify_outside(&outside, &matches);

    if matches.len() < params.data_quality.minimum_pings {
        trace.add_error(format!(
            "Trace has {} pings, but only {} within {buffer}m from any network link",
            trace.len(),
            matches.len()
        ));
        return CandidateSet { matches, links: Vec::new(), unmatchable };
    }

    derive_stop_nodes(network, &mut matches);

    let distinct_stops: FxHashSet<NodeId> = matches.iter().map(|m| m.stop_node).collect();
    if distinct_stops.len() < 2 {
        trace.add_error("All valid GPS pings map to a single point in the network");
    }

    // Deduplicated candidate set, in first-use order.
    let mut seen: FxHashSet<LinkIdx> = FxHashSet::default();
    let links: Vec<LinkIdx> = matches
        .iter()
        .map(|m| m.link)
        .filter(|&l| seen.insert(l))
        .collect();

    CandidateSet { matches, links, unmatchable }
}

// ── Stop nodes ────────────────────────────────────────────────────────────────

/// Does the tangent bearing run with the link's digitised direction (a→b)?
fn is_forward(tangent_bearing: f64, link_bearing: f64) -> bool {
    let diff = (tangent_bearing - link_bearing).abs();
    diff < 90.0 || diff > 270.0
}

/// Orient every primary candidate's endpoints against the ping's tangent
/// bearing.
///
/// Ordinary pings anchor at the upstream node of their travel direction, so
/// routing through them approaches along the candidate link.  The last ping
/// instead pins the downstream node — the path must run the final link to
/// its far end.  When the whole trace maps to a single link, upstream and
/// downstream of the endpoints are resolved by the arc-length order of the
/// first and last ping projections on that link.
fn derive_stop_nodes(network: &Network, matches: &mut [PingMatch]) {
    if matches.is_empty() {
        return;
    }
    for m in matches.iter_mut() {
        let (a, b) = network.link_endpoints(m.link);
        let forward = is_forward(m.tangent_bearing, network.link_bearing(m.link));
        m.stop_node = if forward { a } else { b };
    }

    // Endpoint waypoints: first and last matchable ping.
    let n = matches.len();
    matches[0].flag = WaypointFlag::Endpoint;
    matches[n - 1].flag = WaypointFlag::Endpoint;

    let single_link = matches.iter().all(|m| m.link == matches[0].link);
    if !single_link {
        let last = &mut matches[n - 1];
        let (a, b) = network.link_endpoints(last.link);
        let forward = is_forward(last.tangent_bearing, network.link_bearing(last.link));
        last.stop_node = if forward { b } else { a };
    } else {
        let link = matches[0].link;
        let (a, b) = network.link_endpoints(link);
        let geometry = network.link_geometry(link);
        if geometry.project(matches[0].xy) <= geometry.project(matches[n - 1].xy) {
            matches[0].stop_node = a;
            matches[n - 1].stop_node = b;
        } else {
            matches[0].stop_node = b;
            matches[n - 1].stop_node = a;
        }
    }
}

// ── Unmatchable classification ────────────────────────────────────────────────

fn classify_outside(
    outside: &[(PingId, i64)],
    matches: &[PingMatch],
) -> Vec<UnmatchablePing> {
    let first_matched = matches.first().map(|m| m.ping_id);
    let last_matched = matches.last().map(|m| m.ping_id);

    outside
        .iter()
        .map(|&(ping_id, timestamp)| {
            let position = match (first_matched, last_matched) {
                (Some(first), _) if ping_id < first => PingPosition::BeforeStart,
                (_, Some(last)) if ping_id > last => PingPosition::AfterEnd,
                _ => PingPosition::Middle,
            };
            UnmatchablePing { ping_id, timestamp, position }
        })
        .collect()
}
