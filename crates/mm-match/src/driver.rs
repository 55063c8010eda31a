//! The match driver: routing → evaluating → refining until done or failed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use mm_core::{LinkIdx, NodeId, Parameters};
use mm_spatial::{GraphCosts, Network, Router};
use mm_trace::Trace;

use crate::candidates::{CandidateSet, select_candidates};
use crate::outcome::{MatchOutcome, MatchState, MatchedLink};
use crate::quality::evaluate;
use crate::shape::build_path_shape;
use crate::waypoints::{WaypointFlag, add_waypoint};

/// Matches one trace at a time against a shared read-only [`Network`].
///
/// The driver owns the only mutable routing state — a [`GraphCosts`]
/// overlay cloned from the network baseline — so one driver per worker
/// thread gives the concurrency model of the batch orchestrator for free.
/// `reset` + `discount` are paired at the top of every routing attempt,
/// keeping cost bias strictly scoped to the current trace.
pub struct MatchDriver<'n, R: Router> {
    network: &'n Network,
    router: R,
    costs: GraphCosts,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'n, R: Router> MatchDriver<'n, R> {
    pub fn new(network: &'n Network, router: R) -> Self {
        Self {
            network,
            router,
            costs: network.cost_overlay(),
            cancel: None,
        }
    }

    /// Honor a cooperative cancellation signal, checked between refinement
    /// iterations.  In-flight shortest-path calls run to completion.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }

    /// Match one conditioned trace.
    ///
    /// A trace with data-quality errors is skipped (published with
    /// `success = false`) unless `ignore_errors` is set.  Match and routing
    /// failures are reported through the outcome, never as errors.
    pub fn map_match(
        &mut self,
        trace: &mut Trace,
        params: &Parameters,
        ignore_errors: bool,
    ) -> MatchOutcome {
        let mut outcome = MatchOutcome {
            trace_id: trace.trace_id,
            ..MatchOutcome::default()
        };

        if trace.has_error() && !ignore_errors {
            log::debug!("trace {}: skipped, {} data-quality errors", trace.trace_id, trace.errors().len());
            outcome.state = MatchState::Failed;
            outcome.errors = trace.errors().to_vec();
            return outcome;
        }

        let started = Instant::now();
        let mut cand = select_candidates(self.network, trace, params);

        let blocked = trace.has_error() && !ignore_errors;
        if blocked || cand.links.is_empty() {
            // No candidate links means selection aborted (nothing matched,
            // or too few pings in the buffer): there is nothing to route.
            outcome.state = MatchState::Failed;
        } else {
            self.run_loop(trace, params, &mut cand, &mut outcome);
        }

        outcome.match_secs = started.elapsed().as_secs_f64();
        let travelled = trace.travelled_dist();
        if travelled > 0.0 {
            outcome.distance_ratio = outcome.path_shape.length() / travelled;
        }
        outcome.errors = trace.errors().to_vec();
        if params.map_matching.keep_ping_classification {
            outcome.unmatchable = cand.unmatchable;
        }
        outcome
    }

    fn run_loop(
        &mut self,
        trace: &Trace,
        params: &Parameters,
        cand: &mut CandidateSet,
        outcome: &mut MatchOutcome,
    ) {
        let mm = &params.map_matching;

        let mut prev_quality = 0.0;
        let mut trials = 0usize;
        let mut links: Vec<LinkIdx> = Vec::new();
        let mut directions: Vec<i8> = Vec::new();
        let mut mileposts: Vec<f64> = Vec::new();

        for round in 0..=mm.maximum_waypoints {
            if self.cancelled() {
                log::warn!("trace {}: cancelled after {round} rounds", trace.trace_id);
                outcome.state = MatchState::Failed;
                break;
            }

            // ── Routing ───────────────────────────────────────────────────
            outcome.state = MatchState::Routing;
            self.costs.reset();
            self.costs.discount(&cand.links, mm.cost_discount);

            let waypoints: Vec<NodeId> = cand
                .matches
                .iter()
                .filter(|m| m.flag.is_active())
                .map(|m| m.stop_node)
                .collect();

            links.clear();
            directions.clear();
            mileposts.clear();
            let mut pos = 0.0;
            for pair in waypoints.windows(2) {
                let (start, end) = (pair[0], pair[1]);
                if start == end {
                    continue;
                }
                match self.router.compute_path(self.network, &self.costs, start, end) {
                    None => {
                        // Infeasible leg: skip it; the offset stays at the
                        // last successful leg's cumulative milepost.
                        log::debug!("trace {}: no path {start} → {end}, leg skipped", trace.trace_id);
                    }
                    Some(leg) => {
                        links.extend_from_slice(&leg.links);
                        directions.extend_from_slice(&leg.directions);
                        mileposts.extend(leg.mileposts.iter().map(|m| m + pos));
                        if let Some(&last) = mileposts.last() {
                            pos = last;
                        }
                    }
                }
            }

            // ── Evaluating ────────────────────────────────────────────────
            outcome.state = MatchState::Evaluating;
            let shape = build_path_shape(self.network, &links, &directions, &cand.matches);
            let (quality, raw) = evaluate(&mut cand.matches, &shape, mm.buffer_size, trace.len());
            outcome.match_quality = quality;
            outcome.match_quality_raw = raw;
            outcome.path_shape = shape;

            if quality >= mm.minimum_match_quality {
                outcome.state = MatchState::Done;
                break;
            }
            if round == mm.maximum_waypoints {
                log::debug!(
                    "trace {}: waypoint budget exhausted at quality {quality:.3}",
                    trace.trace_id
                );
                outcome.state = MatchState::Failed;
                break;
            }

            // ── Refining ──────────────────────────────────────────────────
            outcome.state = MatchState::Refining;

            // A trial earns its keep only by strictly improving quality.
            let improved = quality > prev_quality;
            for m in cand.matches.iter_mut().filter(|m| m.flag == WaypointFlag::Trial) {
                m.flag = if improved { WaypointFlag::Fixed } else { WaypointFlag::None };
            }
            prev_quality = quality;

            if !add_waypoint(&mut cand.matches) {
                log::debug!(
                    "trace {}: refinement exhausted at quality {quality:.3}",
                    trace.trace_id
                );
                outcome.state = MatchState::Failed;
                break;
            }
            trials += 1;
        }

        outcome.waypoints_used = trials;
        outcome.links = links
            .iter()
            .zip(&directions)
            .zip(&mileposts)
            .map(|((&link, &direction), &milepost)| MatchedLink {
                link: self.network.link_id(link),
                direction,
                milepost,
            })
            .collect();
    }
}
