//! Waypoint flags and trial-waypoint selection.

use rustc_hash::{FxHashMap, FxHashSet};

use mm_core::NodeId;

use crate::candidates::PingMatch;

/// Routing role of a matchable ping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum WaypointFlag {
    /// Ordinary ping; not routed through.
    #[default]
    None,
    /// First/last matchable ping — pinned for the whole match.
    Endpoint,
    /// Inserted to improve matching; revoked if it doesn't.
    Trial,
    /// A trial that strictly improved quality and was retained.
    Fixed,
}

impl WaypointFlag {
    /// Does the driver route through this ping?
    #[inline]
    pub fn is_active(self) -> bool {
        self != WaypointFlag::None
    }
}

/// Choose one ping from the worst uncovered stretch and mark it `Trial`.
///
/// - Pings not covered by the last attempted path and not already waypoints
///   are grouped into contiguous runs by ping id.
/// - Runs are visited by total elapsed time, worst first.
/// - Within a run, the most frequent stop node not already routed through
///   wins (smallest node id on a frequency tie), and among its pings the
///   earliest.
///
/// Inserts at most one trial per call; returns `false` when no run offers a
/// usable ping, which tells the driver refinement is exhausted.
pub fn add_waypoint(matches: &mut [PingMatch]) -> bool {
    let active_nodes: FxHashSet<NodeId> = matches
        .iter()
        .filter(|m| m.flag.is_active())
        .map(|m| m.stop_node)
        .collect();

    // Contiguous runs (index ranges) of uncovered, unflagged pings.  A gap
    // in ping ids (unmatchable pings in between) also breaks a run.
    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut start: Option<usize> = None;
    for (i, m) in matches.iter().enumerate() {
        if m.covered || m.flag != WaypointFlag::None {
            if let Some(s) = start.take() {
                runs.push((s, i - 1));
            }
            continue;
        }
        match start {
            None => start = Some(i),
            Some(s) => {
                if matches[i - 1].ping_id.0 + 1 != m.ping_id.0 {
                    runs.push((s, i - 1));
                    start = Some(i);
                }
            }
        }
    }
    if let Some(s) = start {
        runs.push((s, matches.len() - 1));
    }

    // Worst stretch first: longest elapsed time between run ends.
    runs.sort_by_key(|&(s, e)| std::cmp::Reverse(matches[e].timestamp - matches[s].timestamp));

    for (s, e) in runs {
        let run = &matches[s..=e];

        let mut counts: FxHashMap<NodeId, usize> = FxHashMap::default();
        for m in run.iter().filter(|m| !active_nodes.contains(&m.stop_node)) {
            *counts.entry(m.stop_node).or_default() += 1;
        }
        // Mode; smallest node id wins a tie.
        let Some(mode) = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(&node, _)| node)
        else {
            continue;
        };

        if let Some(pick) = run.iter().position(|m| m.stop_node == mode) {
            matches[s + pick].flag = WaypointFlag::Trial;
            return true;
        }
    }
    false
}
