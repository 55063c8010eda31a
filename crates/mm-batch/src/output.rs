//! CSV result output.
//!
//! Creates up to three files in the configured output directory:
//! - `matched_links.csv` — the reconstructed link sequence per trace
//! - `trace_summary.csv` — one quality/status row per trace
//! - `unmatchable_pings.csv` — only when the matcher kept classification

use std::fs::File;
use std::path::Path;

use csv::Writer;

use mm_match::MatchOutcome;

use crate::BatchResult;

/// Writes match outcomes to CSV files.
pub struct CsvResultWriter {
    links: Writer<File>,
    summary: Writer<File>,
    unmatchable: Option<Writer<File>>,
    finished: bool,
}

impl CsvResultWriter {
    /// Open (or create) the output files in `dir` and write the header
    /// rows.  Pass `with_unmatchable` when `keep_ping_classification` is on.
    pub fn new(dir: &Path, with_unmatchable: bool) -> BatchResult<Self> {
        let mut links = Writer::from_path(dir.join("matched_links.csv"))?;
        links.write_record(["trace_id", "seq", "link_id", "direction", "milepost"])?;

        let mut summary = Writer::from_path(dir.join("trace_summary.csv"))?;
        summary.write_record([
            "trace_id",
            "success",
            "match_quality",
            "match_quality_raw",
            "waypoints_used",
            "distance_ratio",
            "match_secs",
            "errors",
        ])?;

        let unmatchable = if with_unmatchable {
            let mut w = Writer::from_path(dir.join("unmatchable_pings.csv"))?;
            w.write_record(["trace_id", "ping_id", "timestamp", "position"])?;
            Some(w)
        } else {
            None
        };

        Ok(Self { links, summary, unmatchable, finished: false })
    }

    pub fn write_outcome(&mut self, outcome: &MatchOutcome) -> BatchResult<()> {
        for (seq, l) in outcome.links.iter().enumerate() {
            self.links.write_record(&[
                outcome.trace_id.0.to_string(),
                seq.to_string(),
                l.link.0.to_string(),
                l.direction.to_string(),
                format!("{:.2}", l.milepost),
            ])?;
        }

        self.summary.write_record(&[
            outcome.trace_id.0.to_string(),
            (outcome.success() as u8).to_string(),
            format!("{:.4}", outcome.match_quality),
            format!("{:.4}", outcome.match_quality_raw),
            outcome.waypoints_used.to_string(),
            format!("{:.3}", outcome.distance_ratio),
            format!("{:.3}", outcome.match_secs),
            outcome.errors.join("; "),
        ])?;

        if let Some(w) = self.unmatchable.as_mut() {
            for u in &outcome.unmatchable {
                w.write_record(&[
                    outcome.trace_id.0.to_string(),
                    u.ping_id.0.to_string(),
                    u.timestamp.to_string(),
                    u.position.as_str().to_string(),
                ])?;
            }
        }
        Ok(())
    }

    pub fn finish(&mut self) -> BatchResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.links.flush()?;
        self.summary.flush()?;
        if let Some(w) = self.unmatchable.as_mut() {
            w.flush()?;
        }
        Ok(())
    }
}
