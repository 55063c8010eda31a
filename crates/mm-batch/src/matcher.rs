//! The batch orchestrator.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use mm_core::Parameters;
use mm_match::{MatchDriver, MatchOutcome, MatchState};
use mm_spatial::{DijkstraRouter, Network};
use mm_trace::{Trace, condition, load_traces_csv, load_traces_reader};

use crate::BatchResult;

// ── CancelToken ───────────────────────────────────────────────────────────────

/// Cooperative cancellation for a batch run.
///
/// Checked between traces and, inside each driver, between refinement
/// iterations; in-flight shortest-path calls run to completion.  Cloning is
/// cheap and all clones observe the same flag.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub(crate) fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

// ── MapMatcher ────────────────────────────────────────────────────────────────

/// Loads traces, fans the per-trace matching out over workers, and collects
/// one [`MatchOutcome`] per trace, in input order.
pub struct MapMatcher {
    network: Network,
    pub parameters: Parameters,
    traces: Vec<Trace>,
    cancel: CancelToken,
}

impl MapMatcher {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            parameters: Parameters::default(),
            traces: Vec::new(),
            cancel: CancelToken::new(),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// A handle callers can use to abort the run from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Load and condition GPS traces from a CSV file.  Returns how many
    /// traces were added.
    pub fn load_traces_csv(&mut self, path: &Path) -> BatchResult<usize> {
        let groups = load_traces_csv(path)?;
        self.condition_groups(groups)
    }

    /// Like [`load_traces_csv`] but accepts any `Read` source.
    pub fn load_traces_reader<R: Read>(&mut self, reader: R) -> BatchResult<usize> {
        let groups = load_traces_reader(reader)?;
        self.condition_groups(groups)
    }

    fn condition_groups(
        &mut self,
        groups: Vec<Vec<mm_trace::RawPing>>,
    ) -> BatchResult<usize> {
        let added = groups.len();
        for raw in groups {
            self.traces.push(condition(raw, &self.parameters)?);
        }
        Ok(added)
    }

    /// Add an already-conditioned trace.
    pub fn add_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    // ── Matching ──────────────────────────────────────────────────────────

    /// Match every loaded trace and return one outcome per trace, in load
    /// order.
    ///
    /// Traces with data-quality errors are skipped unless `ignore_errors`
    /// is set; they still produce an outcome with `success() == false`.
    /// After cancellation, remaining traces are published as failed without
    /// being matched.
    pub fn map_match(&mut self, ignore_errors: bool) -> BatchResult<Vec<MatchOutcome>> {
        self.parameters.validate()?;

        log::info!("map-matching {} traces", self.traces.len());
        let outcomes = self.run_all(ignore_errors);

        let succeeded = outcomes.iter().filter(|o| o.success()).count();
        log::info!("succeeded: {succeeded}");
        log::info!("failed: {}", outcomes.len() - succeeded);
        Ok(outcomes)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_all(&mut self, ignore_errors: bool) -> Vec<MatchOutcome> {
        let network = &self.network;
        let params = &self.parameters;
        let cancel = &self.cancel;

        let mut driver = MatchDriver::new(network, DijkstraRouter).with_cancel(cancel.flag());
        self.traces
            .iter_mut()
            .map(|trace| run_one(&mut driver, trace, params, ignore_errors, cancel))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn run_all(&mut self, ignore_errors: bool) -> Vec<MatchOutcome> {
        use rayon::prelude::*;

        let network = &self.network;
        let params = &self.parameters;
        let cancel = &self.cancel;

        // Disjoint chunks, one worker (and one driver, hence one scratch
        // cost overlay) per chunk.  Chunk results come back in order, so
        // flattening preserves the input order.
        let workers = rayon::current_num_threads().max(1);
        let chunk_size = self.traces.len().div_ceil(workers).max(1);

        // Collect per-chunk, then flatten sequentially: par_chunks_mut is
        // indexed, so chunk results come back in input order.
        let nested: Vec<Vec<MatchOutcome>> = self
            .traces
            .par_chunks_mut(chunk_size)
            .map(|chunk| {
                let mut driver =
                    MatchDriver::new(network, DijkstraRouter).with_cancel(cancel.flag());
                chunk
                    .iter_mut()
                    .map(|trace| run_one(&mut driver, trace, params, ignore_errors, cancel))
                    .collect::<Vec<_>>()
            })
            .collect();
        nested.into_iter().flatten().collect()
    }
}

/// Match one trace, or publish it as failed when the batch was cancelled.
fn run_one(
    driver: &mut MatchDriver<'_, DijkstraRouter>,
    trace: &mut Trace,
    params: &Parameters,
    ignore_errors: bool,
    cancel: &CancelToken,
) -> MatchOutcome {
    if cancel.is_cancelled() {
        return MatchOutcome {
            trace_id: trace.trace_id,
            state: MatchState::Failed,
            errors: trace.errors().to_vec(),
            ..MatchOutcome::default()
        };
    }
    let outcome = driver.map_match(trace, params, ignore_errors);
    log::debug!(
        "trace {}: success={} quality={:.3} in {:.3}s",
        outcome.trace_id,
        outcome.success(),
        outcome.match_quality,
        outcome.match_secs
    );
    outcome
}
