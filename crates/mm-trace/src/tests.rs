//! Unit tests for mm-trace.

#[cfg(test)]
mod helpers {
    use mm_core::{GeoPoint, TraceId};

    use crate::RawPing;

    /// `n` pings marching east along the equator: `spacing_deg` of longitude
    /// and `step_secs` seconds between consecutive pings.
    pub fn eastbound(n: usize, spacing_deg: f64, step_secs: i64) -> Vec<RawPing> {
        (0..n)
            .map(|i| RawPing {
                trace_id: TraceId(1),
                timestamp: 1_618_500_000 + i as i64 * step_secs,
                geo: GeoPoint::new(0.0, i as f64 * spacing_deg),
            })
            .collect()
    }
}

#[cfg(test)]
mod conditioner {
    use mm_core::{GeoPoint, Parameters, TraceId};

    use super::helpers::eastbound;
    use crate::{RawPing, TraceError, condition};

    #[test]
    fn happy_trace_has_no_errors() {
        // 20 pings, ~55.7 m apart every 30 s → ~1.9 m/s, ~1 km coverage.
        let trace = condition(eastbound(20, 0.0005, 30), &Parameters::default()).unwrap();
        assert!(!trace.has_error(), "errors: {:?}", trace.errors());
        assert_eq!(trace.len(), 20);
        assert_eq!(trace.trace_id, TraceId(1));
    }

    #[test]
    fn ping_ids_contiguous_and_timestamps_increasing() {
        let mut raw = eastbound(20, 0.0005, 30);
        raw.reverse(); // arrive unsorted
        let trace = condition(raw, &Parameters::default()).unwrap();

        for (i, p) in trace.pings().iter().enumerate() {
            assert_eq!(p.ping_id.0 as usize, i + 1);
        }
        for w in trace.pings().windows(2) {
            assert!(w[0].timestamp < w[1].timestamp);
        }
    }

    #[test]
    fn segment_fields() {
        let trace = condition(eastbound(20, 0.0005, 30), &Parameters::default()).unwrap();
        let pings = trace.pings();

        assert_eq!(pings[0].segment_dist, 0.0);
        assert_eq!(pings[0].segment_speed, 0.0);

        assert!((pings[1].segment_dist - 55.66).abs() < 0.5);
        assert_eq!(pings[1].segment_secs, 30.0);
        assert!((pings[1].segment_speed - 55.66 / 30.0).abs() < 0.05);

        // Eastbound: tangent bearing 90°, last value replicated.
        assert!((pings[0].tangent_bearing - 90.0).abs() < 1e-6);
        assert!((pings[19].tangent_bearing - 90.0).abs() < 1e-6);
    }

    #[test]
    fn too_few_pings() {
        let trace = condition(eastbound(5, 0.001, 30), &Parameters::default()).unwrap();
        assert!(trace.has_error());
        assert!(trace.errors().iter().any(|e| e.contains("only 5 pings")));
    }

    #[test]
    fn insufficient_coverage() {
        // 20 pings inside ~20 m.
        let trace = condition(eastbound(20, 0.00001, 30), &Parameters::default()).unwrap();
        assert!(trace.errors().iter().any(|e| e.contains("covers only")));
    }

    #[test]
    fn jittery_duplicates_flagged_and_deduplicated() {
        let mut raw = eastbound(20, 0.0005, 30);
        // A second ping at the same timestamp as ping 5, ~100 m away.
        let dup = RawPing {
            timestamp: raw[5].timestamp,
            geo: GeoPoint::new(0.0009, raw[5].geo.lon),
            ..raw[5]
        };
        raw.insert(6, dup);

        let trace = condition(raw, &Parameters::default()).unwrap();
        assert!(trace.errors().iter().any(|e| e.contains("jittery")), "{:?}", trace.errors());
        assert!(
            trace.warnings().iter().any(|w| w.contains("same timestamp")),
            "{:?}",
            trace.warnings()
        );
        // First of the duplicate group is kept.
        assert_eq!(trace.len(), 20);
        assert_eq!(trace.pings()[5].geo.lat, 0.0);
    }

    #[test]
    fn tight_duplicates_are_only_a_warning() {
        let mut raw = eastbound(20, 0.0005, 30);
        let dup = RawPing {
            timestamp: raw[5].timestamp,
            geo: GeoPoint::new(0.000_005, raw[5].geo.lon), // ~0.6 m away
            ..raw[5]
        };
        raw.insert(6, dup);

        let trace = condition(raw, &Parameters::default()).unwrap();
        assert!(!trace.errors().iter().any(|e| e.contains("jittery")));
        assert!(trace.warnings().iter().any(|w| w.contains("same timestamp")));
    }

    #[test]
    fn speeding_budget_exceeded() {
        // ~1113 m every 30 s → 37.1 m/s sustained for 570 s.
        let trace = condition(eastbound(20, 0.01, 30), &Parameters::default()).unwrap();
        assert!(
            trace.errors().iter().any(|e| e.contains("Max speed surpassed")),
            "{:?}",
            trace.errors()
        );
    }

    #[test]
    fn brief_speeding_tolerated() {
        // One fast jump of ~1113 m in 30 s; the rest is slow.
        let mut raw = eastbound(20, 0.0005, 30);
        for p in raw.iter_mut().skip(10) {
            p.geo.lon += 0.01;
        }
        let trace = condition(raw, &Parameters::default()).unwrap();
        assert!(!trace.errors().iter().any(|e| e.contains("Max speed")));
    }

    #[test]
    fn empty_is_structural() {
        assert!(matches!(
            condition(Vec::new(), &Parameters::default()),
            Err(TraceError::Empty)
        ));
    }

    #[test]
    fn mixed_trace_ids_are_structural() {
        let mut raw = eastbound(20, 0.0005, 30);
        raw[3].trace_id = TraceId(2);
        assert!(matches!(
            condition(raw, &Parameters::default()),
            Err(TraceError::MixedTraceIds(TraceId(1), TraceId(2)))
        ));
    }

    #[test]
    fn coverage_diagonal() {
        let trace = condition(eastbound(20, 0.0005, 30), &Parameters::default()).unwrap();
        // 19 gaps × ~55.66 m east.
        assert!((trace.coverage() - 19.0 * 55.66).abs() < 5.0);
    }
}

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{TraceError, load_traces_reader, loader::parse_timestamp};

    #[test]
    fn groups_by_trace_in_first_seen_order() {
        let csv = "\
trace_id,timestamp,longitude,latitude,heading
9,1618500000,-87.68,41.83,12.5
9,1618500030,-87.67,41.83,13.0
4,1618500000,-87.60,41.80,
9,1618500060,-87.66,41.83,
";
        let groups = load_traces_reader(Cursor::new(csv)).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 3); // trace 9 seen first
        assert_eq!(groups[1].len(), 1);
        assert_eq!(groups[0][0].timestamp, 1_618_500_000);
        assert!((groups[0][0].geo.lon - -87.68).abs() < 1e-9);
    }

    #[test]
    fn missing_mandatory_column() {
        let csv = "trace_id,timestamp,longitude\n1,0,-87.0\n";
        assert!(matches!(
            load_traces_reader(Cursor::new(csv)),
            Err(TraceError::MissingField(f)) if f == "latitude"
        ));
    }

    #[test]
    fn datetime_timestamps() {
        assert_eq!(parse_timestamp("0").unwrap(), 0);
        assert_eq!(parse_timestamp("1970-01-01T00:00:00Z").unwrap(), 0);
        assert_eq!(parse_timestamp("1970-01-02 00:00:01").unwrap(), 86_401);
        // 2021-04-15 00:00:00 UTC
        assert_eq!(parse_timestamp("2021-04-15T12:00:00Z").unwrap(), 1_618_444_800 + 43_200);
    }

    #[test]
    fn garbage_timestamp_is_parse_error() {
        assert!(matches!(
            parse_timestamp("yesterday-ish"),
            Err(TraceError::Parse(_))
        ));
    }
}
