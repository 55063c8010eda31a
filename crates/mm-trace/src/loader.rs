//! Trace CSV loader.
//!
//! # CSV format
//!
//! One row per ping, WGS84 coordinates:
//!
//! ```csv
//! trace_id,timestamp,longitude,latitude
//! 7,1618500000,-87.6805,41.8325
//! 7,1618500030,-87.6798,41.8325
//! ```
//!
//! `timestamp` is either integer Unix seconds or a
//! `YYYY-MM-DD[T ]HH:MM:SS[Z]` datetime.  An optional `heading` column is
//! accepted and ignored — the matcher derives tangent bearings itself.
//! Rows are grouped by `trace_id`, preserving first-appearance order of the
//! traces.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use mm_core::{GeoPoint, TraceId};

use crate::trace::RawPing;
use crate::{TraceError, TraceResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TraceRecord {
    trace_id: u64,
    timestamp: String,
    longitude: f64,
    latitude: f64,
}

const MANDATORY_FIELDS: [&str; 4] = ["trace_id", "timestamp", "longitude", "latitude"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load raw ping groups from a CSV file, one `Vec<RawPing>` per trace id.
pub fn load_traces_csv(path: &Path) -> TraceResult<Vec<Vec<RawPing>>> {
    let file = std::fs::File::open(path)?;
    load_traces_reader(file)
}

/// Like [`load_traces_csv`] but accepts any `Read` source.
pub fn load_traces_reader<R: Read>(reader: R) -> TraceResult<Vec<Vec<RawPing>>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| TraceError::Parse(e.to_string()))?;
    for field in MANDATORY_FIELDS {
        if !headers.iter().any(|h| h == field) {
            return Err(TraceError::MissingField(field.to_string()));
        }
    }

    let mut by_trace: HashMap<u64, Vec<RawPing>> = HashMap::new();
    let mut order: Vec<u64> = Vec::new();

    for result in csv_reader.deserialize::<TraceRecord>() {
        let row = result.map_err(|e| TraceError::Parse(e.to_string()))?;
        let timestamp = parse_timestamp(&row.timestamp)?;

        let pings = by_trace.entry(row.trace_id).or_insert_with(|| {
            order.push(row.trace_id);
            Vec::new()
        });
        pings.push(RawPing {
            trace_id: TraceId(row.trace_id),
            timestamp,
            geo: GeoPoint::new(row.latitude, row.longitude),
        });
    }

    Ok(order
        .into_iter()
        .map(|id| by_trace.remove(&id).unwrap_or_default())
        .collect())
}

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Parse integer Unix seconds or a `YYYY-MM-DD[T ]HH:MM:SS[Z]` datetime
/// (treated as UTC).
pub fn parse_timestamp(s: &str) -> TraceResult<i64> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return Ok(secs);
    }
    parse_datetime(s).ok_or_else(|| TraceError::Parse(format!("invalid timestamp {s:?}")))
}

fn parse_datetime(s: &str) -> Option<i64> {
    let s = s.strip_suffix('Z').unwrap_or(s);
    let (date, time) = s.split_once(['T', ' '])?;

    let mut date_parts = date.split('-');
    let year: i64 = date_parts.next()?.parse().ok()?;
    let month: u32 = date_parts.next()?.parse().ok()?;
    let day: u32 = date_parts.next()?.parse().ok()?;
    if date_parts.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let mut time_parts = time.split(':');
    let hour: u32 = time_parts.next()?.parse().ok()?;
    let minute: u32 = time_parts.next()?.parse().ok()?;
    let second: u32 = time_parts.next().unwrap_or("0").parse().ok()?;
    if time_parts.next().is_some() || hour > 23 || minute > 59 || second > 60 {
        return None;
    }

    Some(
        days_from_civil(year, month, day) * 86_400
            + i64::from(hour) * 3_600
            + i64::from(minute) * 60
            + i64::from(second),
    )
}

/// Days from 1970-01-01 for a proleptic Gregorian date
/// (Howard Hinnant's `days_from_civil`).
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (month as i64 + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
