//! Geographic coordinate type and the working-CRS projection.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  All distance thresholds in the
//! matcher are metric (down to the 1 m jitter test), and Web-Mercator
//! ordinates reach ~2e7 m, so single precision would eat the whole tolerance.
//!
//! Bearings are always computed on geographic coordinates; metric distances
//! and buffers on projected ones (see [`crate::polyline`]).

use crate::polyline::XyPoint;

/// Spherical Web-Mercator radius (EPSG:3857), metres.
const MERCATOR_R: f64 = 6_378_137.0;

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        const R: f64 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Forward spherical Web-Mercator transform to the working metric CRS.
    ///
    /// Latitudes are clamped to ±85.051129° (the square Mercator world);
    /// traces beyond that are not road vehicles.
    pub fn to_mercator(self) -> XyPoint {
        let lat = self.lat.clamp(-85.051_129, 85.051_129).to_radians();
        XyPoint {
            x: MERCATOR_R * self.lon.to_radians(),
            y: MERCATOR_R * (std::f64::consts::FRAC_PI_4 + lat * 0.5).tan().ln(),
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
