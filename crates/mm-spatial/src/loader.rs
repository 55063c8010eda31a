//! Link CSV loader.
//!
//! # CSV format
//!
//! One row per link.  Mandatory columns:
//!
//! ```csv
//! link_id,a_node,b_node,geometry
//! 1,10,11,"LINESTRING (-87.68 41.83, -87.67 41.83)"
//! ```
//!
//! `geometry` is a WKT `LINESTRING` in WGS84 lon/lat order.  An optional
//! `direction` column carries the conventional −1/0/+1 one-way flag
//! (default 0 = both ways).  Any further column that parses as a number is
//! captured as a named link attribute, so a `speed_limit` column becomes
//! available to [`LinkStore::set_speed_field`](crate::LinkStore::set_speed_field).

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use mm_core::{GeoPoint, LinkId};

use crate::link::{LinkDirection, LinkStore, LinkStoreBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LinkRecord {
    link_id: u64,
    a_node: u64,
    b_node: u64,
    geometry: String,
    #[serde(default)]
    direction: Option<i8>,
}

const KNOWN_COLUMNS: [&str; 5] = ["link_id", "a_node", "b_node", "geometry", "direction"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`LinkStore`] from a CSV file.
pub fn load_links_csv(path: &Path) -> SpatialResult<LinkStore> {
    let file = std::fs::File::open(path)?;
    load_links_reader(file)
}

/// Like [`load_links_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from streams.
pub fn load_links_reader<R: Read>(reader: R) -> SpatialResult<LinkStore> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| SpatialError::Parse(e.to_string()))?
        .clone();

    // Columns beyond the known set become numeric link attributes.
    let extra_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !KNOWN_COLUMNS.contains(h))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut builder = LinkStoreBuilder::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let row: LinkRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| SpatialError::Parse(e.to_string()))?;

        let geometry = parse_linestring(&row.geometry)?;
        let direction = LinkDirection::from_flag(row.direction.unwrap_or(0));
        let link = builder.add_link(
            LinkId(row.link_id),
            row.a_node,
            row.b_node,
            &geometry,
            direction,
        )?;

        for (col, name) in &extra_columns {
            if let Some(value) = record.get(*col).and_then(|v| v.trim().parse::<f64>().ok()) {
                builder.set_attribute(link, name, value);
            }
        }
    }

    Ok(builder.build())
}

// ── WKT parsing ───────────────────────────────────────────────────────────────

/// Parse a WKT `LINESTRING (lon lat, lon lat, …)` into geographic vertices.
fn parse_linestring(wkt: &str) -> SpatialResult<Vec<GeoPoint>> {
    let s = wkt.trim();
    let upper = s.to_ascii_uppercase();
    if !upper.starts_with("LINESTRING") {
        return Err(SpatialError::Parse(format!(
            "expected WKT LINESTRING, got {wkt:?}"
        )));
    }

    let open = s.find('(').ok_or_else(|| bad_wkt(wkt))?;
    let close = s.rfind(')').ok_or_else(|| bad_wkt(wkt))?;
    if close <= open {
        return Err(bad_wkt(wkt));
    }

    s[open + 1..close]
        .split(',')
        .map(|pair| {
            let mut nums = pair.split_whitespace();
            let lon: f64 = nums
                .next()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| bad_wkt(wkt))?;
            let lat: f64 = nums
                .next()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| bad_wkt(wkt))?;
            Ok(GeoPoint::new(lat, lon))
        })
        .collect()
}

fn bad_wkt(wkt: &str) -> SpatialError {
    SpatialError::Parse(format!("malformed LINESTRING {wkt:?}"))
}
