//! One-shot trace conditioning.
//!
//! Turns a raw ping list into a [`Trace`]: sorts, deduplicates simultaneous
//! pings, derives tangent bearings and per-segment distance/time/speed, and
//! accumulates every data-quality finding as an error string.  Only
//! structural problems (empty input, mixed trace ids) return `Err`; a trace
//! that merely fails quality checks is returned with its error list
//! populated so the caller can decide (`ignore_errors`) whether to match it
//! anyway.

use mm_core::{Parameters, PingId, XyPoint, tangent_bearings};

use crate::trace::{Ping, RawPing, Trace};
use crate::{TraceError, TraceResult};

/// Validate and condition one trace.  Runs once; the result is read-only.
pub fn condition(mut raw: Vec<RawPing>, params: &Parameters) -> TraceResult<Trace> {
    let dqp = &params.data_quality;

    let Some(first) = raw.first() else {
        return Err(TraceError::Empty);
    };
    let trace_id = first.trace_id;
    if let Some(other) = raw.iter().find(|p| p.trace_id != trace_id) {
        return Err(TraceError::MixedTraceIds(trace_id, other.trace_id));
    }

    // Stable sort: same-second pings keep input order so "first of each
    // duplicate group" is well defined.
    raw.sort_by_key(|p| p.timestamp);

    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if raw.len() < dqp.minimum_pings {
        errors.push(format!(
            "Trace with only {} pings. Minimum is {}",
            raw.len(),
            dqp.minimum_pings
        ));
    }

    let xy: Vec<XyPoint> = raw.iter().map(|p| p.geo.to_mercator()).collect();
    let coverage = bbox_diagonal(&xy);
    if coverage < dqp.minimum_coverage {
        errors.push(format!(
            "Trace covers only {coverage:.2} m. Minimum is {}",
            dqp.minimum_coverage
        ));
    }

    // ── Simultaneous pings ────────────────────────────────────────────────
    let kept = dedup_simultaneous(&raw, &xy, dqp.maximum_jittery, &mut errors, &mut warnings);
    if kept.len() < raw.len() && kept.len() < dqp.minimum_pings {
        errors.push(format!(
            "Trace with only {} pings. Minimum is {}",
            kept.len(),
            dqp.minimum_pings
        ));
    }

    // ── Derived fields on the deduplicated pings ──────────────────────────
    let geo: Vec<_> = kept.iter().map(|&i| raw[i].geo).collect();
    let bearings = tangent_bearings(&geo);

    let mut pings: Vec<Ping> = Vec::with_capacity(kept.len());
    for (seq, &i) in kept.iter().enumerate() {
        let (segment_dist, segment_secs, segment_speed) = if seq == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let prev = kept[seq - 1];
            let dist = xy[i].distance(xy[prev]);
            let secs = (raw[i].timestamp - raw[prev].timestamp) as f64;
            let speed = if secs > 0.0 { dist / secs } else { -1.0 };
            (dist, secs, speed)
        };

        pings.push(Ping {
            ping_id: PingId(seq as u32 + 1),
            timestamp: raw[i].timestamp,
            geo: raw[i].geo,
            xy: xy[i],
            tangent_bearing: bearings[seq],
            segment_dist,
            segment_secs,
            segment_speed,
        });
    }

    // ── Speeding budget ───────────────────────────────────────────────────
    let speeding_secs: f64 = pings
        .iter()
        .filter(|p| p.segment_speed > dqp.max_speed)
        .map(|p| p.segment_secs)
        .sum();
    if speeding_secs > dqp.max_speed_time {
        errors.push(format!("Max speed surpassed for {} seconds", speeding_secs as i64));
    }

    Ok(Trace::new(trace_id, pings, errors, warnings))
}

/// Indices of the pings to keep: the first of every same-second group.
/// Flags the trace as jittery when any group spreads farther than allowed.
fn dedup_simultaneous(
    raw: &[RawPing],
    xy: &[XyPoint],
    maximum_jittery: f64,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::with_capacity(raw.len());
    let mut worst_spread = 0.0f64;

    let mut i = 0;
    while i < raw.len() {
        let mut j = i + 1;
        while j < raw.len() && raw[j].timestamp == raw[i].timestamp {
            j += 1;
        }
        if j - i > 1 {
            worst_spread = worst_spread.max(bbox_diagonal(&xy[i..j]));
        }
        kept.push(i);
        i = j;
    }

    let dropped = raw.len() - kept.len();
    if dropped > 0 {
        warnings.push(format!("There are {dropped} pings with the same timestamp"));
        if worst_spread > maximum_jittery {
            errors.push(format!(
                "Data is jittery. Same timestamp {worst_spread:.2} m apart."
            ));
        }
    }
    kept
}

fn bbox_diagonal(points: &[XyPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    ((max_x - min_x).powi(2) + (max_y - min_y).powi(2)).sqrt()
}
