//! `mm-core` — foundational types for the `rust_mm` map-matching workspace.
//!
//! This crate is a dependency of every other `mm-*` crate.  It intentionally
//! has no `mm-*` dependencies and minimal external ones (only `thiserror`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`ids`]      | `PingId`, `NodeId`, `LinkIdx`, `LinkId`, `TraceId`      |
//! | [`geo`]      | `GeoPoint`, haversine distance, Web-Mercator projection |
//! | [`bearing`]  | Compass bearings, tangent bearings, alignment predicate |
//! | [`polyline`] | `XyPoint`, `Polyline` arc-length operations             |
//! | [`params`]   | `Parameters` — every knob the matcher consumes          |
//! | [`error`]    | `MmError`, `MmResult`                                   |

pub mod bearing;
pub mod error;
pub mod geo;
pub mod ids;
pub mod params;
pub mod polyline;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use bearing::{bearings_aligned, compass_bearing, polyline_bearing, tangent_bearings};
pub use error::{MmError, MmResult};
pub use geo::GeoPoint;
pub use ids::{LinkId, LinkIdx, NodeId, PingId, TraceId};
pub use params::{DataQuality, Geoprocessing, MapMatching, Parameters};
pub use polyline::{Polyline, XyPoint};
