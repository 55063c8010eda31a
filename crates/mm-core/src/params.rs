//! Matching configuration.
//!
//! Plain structs with documented defaults, grouped the way the matcher
//! consumes them.  Applications either mutate the public fields directly or
//! drive [`Parameters::set`] with dotted keys from a config file; unknown
//! keys are a structural error, never silently ignored.

use crate::error::{MmError, MmResult};

/// Coordinate-frame settings.
#[derive(Clone, Debug)]
pub struct Geoprocessing {
    /// Working metric CRS for all distance/buffer computations.
    /// Only 3857 (spherical Web-Mercator) is implemented.
    pub projected_crs: u32,
}

impl Default for Geoprocessing {
    fn default() -> Self {
        Self { projected_crs: 3857 }
    }
}

/// Trace-conditioning thresholds.
#[derive(Clone, Debug)]
pub struct DataQuality {
    /// Cutoff above which a trace segment counts as speeding, m/s.
    pub max_speed: f64,
    /// Cumulative speeding budget before the trace is flagged, seconds.
    pub max_speed_time: f64,
    /// Lower bound on the conditioned ping count.
    pub minimum_pings: usize,
    /// Lower bound on the trace bounding-box diagonal, metres.
    pub minimum_coverage: f64,
    /// Max spatial spread among same-timestamp pings, metres.
    pub maximum_jittery: f64,
}

impl Default for DataQuality {
    fn default() -> Self {
        Self {
            max_speed: 36.1,
            max_speed_time: 120.0,
            minimum_pings: 15,
            minimum_coverage: 500.0,
            maximum_jittery: 1.0,
        }
    }
}

/// Matching-loop knobs.
#[derive(Clone, Debug)]
pub struct MapMatching {
    /// Multiplier applied to candidate-link costs, in (0, 1].
    pub cost_discount: f64,
    /// Candidate-search radius and coverage-buffer width, metres.
    pub buffer_size: f64,
    /// Success threshold for match quality.
    pub minimum_match_quality: f64,
    /// Budget for refinement iterations.
    pub maximum_waypoints: usize,
    /// Bearing alignment tolerance, degrees.
    pub heading_tolerance: f64,
    /// Whether to emit the unmatchable-ping report.
    pub keep_ping_classification: bool,
}

impl Default for MapMatching {
    fn default() -> Self {
        Self {
            cost_discount: 0.1,
            buffer_size: 20.0,
            minimum_match_quality: 0.99,
            maximum_waypoints: 20,
            heading_tolerance: 22.5,
            keep_ping_classification: false,
        }
    }
}

/// The complete knob set the matcher consumes.
#[derive(Clone, Debug, Default)]
pub struct Parameters {
    pub geoprocessing: Geoprocessing,
    pub data_quality: DataQuality,
    pub map_matching: MapMatching,
}

impl Parameters {
    /// Set one knob by its dotted key, e.g.
    /// `params.set("data_quality.max_speed", "41.0")`.
    ///
    /// Returns [`MmError::UnknownConfigKey`] for keys outside the table in
    /// the crate docs and [`MmError::Parse`] for unparseable values.
    pub fn set(&mut self, key: &str, value: &str) -> MmResult<()> {
        fn num<T: std::str::FromStr>(key: &str, value: &str) -> MmResult<T> {
            value
                .trim()
                .parse()
                .map_err(|_| MmError::Parse(format!("invalid value {value:?} for {key}")))
        }

        match key {
            "geoprocessing.projected_crs" => self.geoprocessing.projected_crs = num(key, value)?,
            "data_quality.max_speed" => self.data_quality.max_speed = num(key, value)?,
            "data_quality.max_speed_time" => self.data_quality.max_speed_time = num(key, value)?,
            "data_quality.minimum_pings" => self.data_quality.minimum_pings = num(key, value)?,
            "data_quality.minimum_coverage" => {
                self.data_quality.minimum_coverage = num(key, value)?
            }
            "data_quality.maximum_jittery" => self.data_quality.maximum_jittery = num(key, value)?,
            "map_matching.cost_discount" => self.map_matching.cost_discount = num(key, value)?,
            "map_matching.buffer_size" => self.map_matching.buffer_size = num(key, value)?,
            "map_matching.minimum_match_quality" => {
                self.map_matching.minimum_match_quality = num(key, value)?
            }
            "map_matching.maximum_waypoints" => {
                self.map_matching.maximum_waypoints = num(key, value)?
            }
            "map_matching.heading_tolerance" => {
                self.map_matching.heading_tolerance = num(key, value)?
            }
            "map_matching.keep_ping_classification" => {
                self.map_matching.keep_ping_classification = num(key, value)?
            }
            _ => return Err(MmError::UnknownConfigKey(key.to_string())),
        }
        Ok(())
    }

    /// Reject configurations the implementation cannot honor.
    pub fn validate(&self) -> MmResult<()> {
        if self.geoprocessing.projected_crs != 3857 {
            return Err(MmError::UnsupportedCrs(self.geoprocessing.projected_crs));
        }
        Ok(())
    }
}
