//! Unit tests for mm-core primitives.

#[cfg(test)]
mod ids {
    use crate::{LinkId, LinkIdx, NodeId, PingId};

    #[test]
    fn index_roundtrip() {
        let id = LinkIdx(42);
        assert_eq!(id.index(), 42);
        assert_eq!(LinkIdx::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(PingId(1) < PingId(2));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(LinkId::INVALID.0, u64::MAX);
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(30.694, -88.043);
        assert!(p.distance_m(p) < 0.01);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = a.distance_m(b);
        assert!((d - 111_195.0).abs() < 500.0, "got {d}");
    }

    #[test]
    fn mercator_equator() {
        let p = GeoPoint::new(0.0, 1.0).to_mercator();
        // One degree of longitude at the equator.
        assert!((p.x - 111_319.49).abs() < 1.0, "got {}", p.x);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn mercator_is_monotonic_in_latitude() {
        let lo = GeoPoint::new(10.0, 0.0).to_mercator();
        let hi = GeoPoint::new(11.0, 0.0).to_mercator();
        assert!(hi.y > lo.y);
    }
}

#[cfg(test)]
mod bearing {
    use crate::{GeoPoint, bearings_aligned, compass_bearing, polyline_bearing, tangent_bearings};

    #[test]
    fn cardinal_scenario() {
        // (0,0) → (0,90) → (0,0) → (−90,0) → (0,0); last value duplicated.
        let pts = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 90.0),
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(-90.0, 0.0),
            GeoPoint::new(0.0, 0.0),
        ];
        let b = tangent_bearings(&pts);
        let expected = [90.0, 270.0, 180.0, 0.0, 0.0];
        assert_eq!(b.len(), expected.len());
        for (got, want) in b.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
    }

    #[test]
    fn periodicity() {
        // The back bearing is the forward bearing shifted by 180° (mod 360),
        // up to great-circle convergence — negligible at these separations.
        let pairs = [
            (GeoPoint::new(10.0, 20.0), GeoPoint::new(11.0, 21.0)),
            (GeoPoint::new(-33.0, 151.0), GeoPoint::new(-34.0, 150.0)),
            (GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 90.0)),
        ];
        for (a, b) in pairs {
            let fwd = compass_bearing(a, b);
            let back = compass_bearing(b, a);
            let diff = (back - fwd).rem_euclid(360.0);
            assert!((diff - 180.0).abs() < 1.0, "a={a} b={b}: {fwd} vs {back}");
        }
    }

    #[test]
    fn tangent_bearing_edge_sizes() {
        assert!(tangent_bearings(&[]).is_empty());
        assert_eq!(tangent_bearings(&[GeoPoint::new(1.0, 2.0)]), vec![0.0]);
    }

    #[test]
    fn polyline_uses_first_and_last_vertex() {
        let line = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(5.0, -3.0), // interior vertex must not matter
            GeoPoint::new(0.0, 10.0),
        ];
        assert!((polyline_bearing(&line) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn alignment_sweep() {
        let tol = 22.5;
        // Perpendicular-ish offsets never align.
        for diff in [50.0, 130.0, 240.0, 310.0] {
            for link in 0..360 {
                let link = link as f64;
                let ping = (link + diff) % 360.0;
                assert!(!bearings_aligned(link, ping, tol), "link={link} diff={diff}");
            }
        }
        // Small offsets always align, directly or across the 0/360 seam.
        for diff in 1..=22 {
            for link in 0..360 {
                let link = link as f64;
                let ping = (link + diff as f64) % 360.0;
                assert!(bearings_aligned(link, ping, tol), "link={link} diff={diff}");
            }
        }
        // Reverse traversal aligns too.
        for diff in 158..=202 {
            for link in 0..360 {
                let link = link as f64;
                let ping = (link + diff as f64) % 360.0;
                assert!(bearings_aligned(link, ping, tol), "link={link} diff={diff}");
            }
        }
    }

    #[test]
    fn alignment_symmetry_and_reverse_invariance() {
        for (a, b) in [(10.0, 20.0), (350.0, 8.0), (181.0, 3.0), (90.0, 271.0)] {
            assert_eq!(
                bearings_aligned(a, b, 22.5),
                bearings_aligned(b, a, 22.5),
                "symmetry at ({a},{b})"
            );
            assert_eq!(
                bearings_aligned(a, b, 22.5),
                bearings_aligned((a + 180.0) % 360.0, b, 22.5),
                "reverse invariance at ({a},{b})"
            );
        }
    }
}

#[cfg(test)]
mod polyline {
    use crate::{Polyline, XyPoint};

    fn l_shape() -> Polyline {
        // (0,0) → (10,0) → (10,10): two 10 m segments.
        Polyline::new(vec![
            XyPoint::new(0.0, 0.0),
            XyPoint::new(10.0, 0.0),
            XyPoint::new(10.0, 10.0),
        ])
    }

    #[test]
    fn length_and_reverse() {
        let line = l_shape();
        assert!((line.length() - 20.0).abs() < 1e-9);
        assert!((line.reversed().length() - 20.0).abs() < 1e-9);
        assert_eq!(line.reversed().points()[0], XyPoint::new(10.0, 10.0));
    }

    #[test]
    fn project_onto_each_arm() {
        let line = l_shape();
        assert!((line.project(XyPoint::new(3.0, 1.0)) - 3.0).abs() < 1e-9);
        assert!((line.project(XyPoint::new(11.0, 4.0)) - 14.0).abs() < 1e-9);
        // Beyond the end clamps to total length.
        assert!((line.project(XyPoint::new(10.0, 50.0)) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn distance_to_point() {
        let line = l_shape();
        assert!((line.distance_to(XyPoint::new(5.0, 2.0)) - 2.0).abs() < 1e-9);
        assert!((line.distance_to(XyPoint::new(13.0, 10.0)) - 3.0).abs() < 1e-9);
        assert!(Polyline::empty().distance_to(XyPoint::new(0.0, 0.0)).is_infinite());
    }

    #[test]
    fn substring_interior() {
        let line = l_shape();
        let mid = line.substring(5.0, 15.0);
        assert!((mid.length() - 10.0).abs() < 1e-9);
        assert_eq!(mid.points().first().copied(), Some(XyPoint::new(5.0, 0.0)));
        assert_eq!(mid.points().last().copied(), Some(XyPoint::new(10.0, 5.0)));
    }

    #[test]
    fn substring_zero_window_is_empty() {
        let line = l_shape();
        assert!(line.substring(7.0, 7.0).is_empty());
        assert!(line.substring(20.0, 20.0).is_empty());
    }

    #[test]
    fn extend_skips_duplicate_joint() {
        let mut a = Polyline::new(vec![XyPoint::new(0.0, 0.0), XyPoint::new(1.0, 0.0)]);
        let b = Polyline::new(vec![XyPoint::new(1.0, 0.0), XyPoint::new(2.0, 0.0)]);
        a.extend_with(&b);
        assert_eq!(a.points().len(), 3);
    }
}

#[cfg(test)]
mod params {
    use crate::{MmError, Parameters};

    #[test]
    fn defaults_match_documentation() {
        let p = Parameters::default();
        assert_eq!(p.geoprocessing.projected_crs, 3857);
        assert_eq!(p.data_quality.minimum_pings, 15);
        assert!((p.data_quality.max_speed - 36.1).abs() < 1e-9);
        assert!((p.map_matching.buffer_size - 20.0).abs() < 1e-9);
        assert!((p.map_matching.heading_tolerance - 22.5).abs() < 1e-9);
        assert_eq!(p.map_matching.maximum_waypoints, 20);
        assert!(!p.map_matching.keep_ping_classification);
    }

    #[test]
    fn dotted_key_set() {
        let mut p = Parameters::default();
        p.set("data_quality.max_speed", "41").unwrap();
        p.set("map_matching.keep_ping_classification", "true").unwrap();
        assert!((p.data_quality.max_speed - 41.0).abs() < 1e-9);
        assert!(p.map_matching.keep_ping_classification);
    }

    #[test]
    fn unknown_key_is_structural() {
        let mut p = Parameters::default();
        let err = p.set("map_matching.does_not_exist", "1").unwrap_err();
        assert!(matches!(err, MmError::UnknownConfigKey(_)));
    }

    #[test]
    fn bad_value_is_parse_error() {
        let mut p = Parameters::default();
        let err = p.set("data_quality.minimum_pings", "lots").unwrap_err();
        assert!(matches!(err, MmError::Parse(_)));
    }

    #[test]
    fn unsupported_crs_rejected() {
        let mut p = Parameters::default();
        p.set("geoprocessing.projected_crs", "4326").unwrap();
        assert!(matches!(p.validate(), Err(MmError::UnsupportedCrs(4326))));
    }
}
