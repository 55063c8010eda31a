//! R-tree spatial index over link geometry.
//!
//! Each polyline **segment** is one R-tree entry, so envelope pruning stays
//! tight for long curvy links.  Queries compute exact point-to-segment
//! distances, reduce to the per-link minimum, and report ascending.

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;

use mm_core::{LinkIdx, XyPoint, polyline::point_segment_distance_sq};

use crate::link::LinkStore;

/// One geometry segment of a link, in projected metres.
#[derive(Clone)]
struct SegmentEntry {
    a: [f64; 2],
    b: [f64; 2],
    link: LinkIdx,
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.a[0].min(self.b[0]), self.a[1].min(self.b[1])],
            [self.a[0].max(self.b[0]), self.a[1].max(self.b[1])],
        )
    }
}

impl PointDistance for SegmentEntry {
    /// Squared Euclidean distance from the query point to the segment.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        point_segment_distance_sq(
            XyPoint::new(point[0], point[1]),
            XyPoint::new(self.a[0], self.a[1]),
            XyPoint::new(self.b[0], self.b[1]),
        )
    }
}

/// Read-only nearest-link index, safe for concurrent query.
pub struct LinkIndex {
    tree: RTree<SegmentEntry>,
}

impl LinkIndex {
    /// Bulk-load every segment of every link.
    pub fn build(store: &LinkStore) -> LinkIndex {
        let mut entries: Vec<SegmentEntry> = Vec::new();
        for link in store.iter() {
            for w in store.geometry(link).points().windows(2) {
                entries.push(SegmentEntry {
                    a: [w[0].x, w[0].y],
                    b: [w[1].x, w[1].y],
                    link,
                });
            }
        }
        LinkIndex { tree: RTree::bulk_load(entries) }
    }

    /// Every link whose geometry lies within `max_distance` metres of
    /// `point`, with its exact distance, sorted ascending by distance
    /// (ties by dense link index).
    pub fn nearest_within(&self, point: XyPoint, max_distance: f64) -> Vec<(LinkIdx, f64)> {
        if max_distance < 0.0 {
            return Vec::new();
        }
        let q = [point.x, point.y];
        let mut best: FxHashMap<LinkIdx, f64> = FxHashMap::default();
        for entry in self
            .tree
            .locate_within_distance(q, max_distance * max_distance)
        {
            let d_sq = entry.distance_2(&q);
            best.entry(entry.link)
                .and_modify(|d| *d = d.min(d_sq))
                .or_insert(d_sq);
        }

        let mut out: Vec<(LinkIdx, f64)> = best
            .into_iter()
            .map(|(link, d_sq)| (link, d_sq.sqrt()))
            .filter(|&(_, d)| d <= max_distance)
            .collect();
        out.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        out
    }
}
