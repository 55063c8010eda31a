//! End-to-end tests for mm-batch: CSV in, matched CSV out.

#[cfg(test)]
mod helpers {
    use std::fmt::Write as _;
    use std::io::Cursor;

    use mm_spatial::{Network, load_links_reader};

    /// Five-link east-west corridor as a links CSV.
    pub fn corridor_csv() -> String {
        let mut out = String::from("link_id,a_node,b_node,geometry\n");
        for i in 0..5 {
            let from = i as f64 * 0.001;
            let to = (i + 1) as f64 * 0.001;
            writeln!(
                out,
                "{},{},{},\"LINESTRING ({from:.4} 0.0, {to:.4} 0.0)\"",
                i + 1,
                i,
                i + 1
            )
            .unwrap();
        }
        out
    }

    pub fn corridor_network() -> Network {
        Network::new(load_links_reader(Cursor::new(corridor_csv())).unwrap())
    }

    /// Trace CSV: trace 7 tracks the corridor with 20 pings; trace 8 has
    /// only 5 pings and fails conditioning.
    pub fn traces_csv() -> String {
        let mut out = String::from("trace_id,timestamp,longitude,latitude\n");
        for i in 0..20 {
            writeln!(
                out,
                "7,{},{:.6},0.00002",
                1_618_500_000 + i * 30,
                0.0001 + i as f64 * 0.00025
            )
            .unwrap();
        }
        for i in 0..5 {
            writeln!(
                out,
                "8,{},{:.6},0.00002",
                1_618_500_000 + i * 30,
                0.0001 + i as f64 * 0.00025
            )
            .unwrap();
        }
        out
    }
}

#[cfg(test)]
mod batch {
    use std::io::Cursor;

    use mm_core::MmError;

    use super::helpers::{corridor_network, traces_csv};
    use crate::{BatchError, MapMatcher};

    #[test]
    fn matches_good_traces_and_reports_bad_ones() {
        let mut matcher = MapMatcher::new(corridor_network());
        let added = matcher
            .load_traces_reader(Cursor::new(traces_csv()))
            .unwrap();
        assert_eq!(added, 2);

        let outcomes = matcher.map_match(false).unwrap();
        assert_eq!(outcomes.len(), 2);

        let good = &outcomes[0];
        assert_eq!(good.trace_id.0, 7);
        assert!(good.success());
        assert!(good.match_quality >= 0.99);
        let ids: Vec<u64> = good.links.iter().map(|l| l.link.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let bad = &outcomes[1];
        assert_eq!(bad.trace_id.0, 8);
        assert!(!bad.success());
        assert!(bad.links.is_empty());
        assert!(bad.errors.iter().any(|e| e.contains("only 5 pings")));
    }

    #[test]
    fn cancelled_batch_publishes_failures() {
        let mut matcher = MapMatcher::new(corridor_network());
        matcher
            .load_traces_reader(Cursor::new(traces_csv()))
            .unwrap();

        matcher.cancel_token().cancel();
        let outcomes = matcher.map_match(false).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.success()));
        assert!(outcomes.iter().all(|o| o.links.is_empty()));
    }

    #[test]
    fn unsupported_crs_is_structural() {
        let mut matcher = MapMatcher::new(corridor_network());
        matcher.parameters.geoprocessing.projected_crs = 4326;
        assert!(matches!(
            matcher.map_match(false),
            Err(BatchError::Config(MmError::UnsupportedCrs(4326)))
        ));
    }
}

#[cfg(test)]
mod output {
    use std::io::Cursor;

    use super::helpers::{corridor_network, traces_csv};
    use crate::{CsvResultWriter, MapMatcher};

    #[test]
    fn writes_all_three_files() {
        let mut matcher = MapMatcher::new(corridor_network());
        matcher.parameters.map_matching.keep_ping_classification = true;
        matcher
            .load_traces_reader(Cursor::new(traces_csv()))
            .unwrap();
        let outcomes = matcher.map_match(false).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut writer = CsvResultWriter::new(dir.path(), true).unwrap();
        for outcome in &outcomes {
            writer.write_outcome(outcome).unwrap();
        }
        writer.finish().unwrap();

        let links = std::fs::read_to_string(dir.path().join("matched_links.csv")).unwrap();
        // Header + 5 corridor links for trace 7.
        assert_eq!(links.lines().count(), 6);
        assert!(links.starts_with("trace_id,seq,link_id,direction,milepost"));
        assert!(links.lines().nth(1).unwrap().starts_with("7,0,1,1,"));

        let summary = std::fs::read_to_string(dir.path().join("trace_summary.csv")).unwrap();
        assert_eq!(summary.lines().count(), 3);
        assert!(summary.contains("only 5 pings"));

        let unmatchable =
            std::fs::read_to_string(dir.path().join("unmatchable_pings.csv")).unwrap();
        // Both traces sat inside the buffer, so only the header remains.
        assert_eq!(unmatchable.lines().count(), 1);
    }
}
