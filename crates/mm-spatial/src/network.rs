//! The network adapter the matcher talks to.
//!
//! Bundles the link store, CSR graph, spatial index, and the baseline cost
//! vector (link lengths).  A `Network` is constructed once per matching
//! session and read-only from then on; each match driver clones a
//! [`GraphCosts`] overlay via [`cost_overlay`](Network::cost_overlay) so
//! cost mutation never crosses traces or workers.

use std::sync::Arc;

use mm_core::{LinkId, LinkIdx, NodeId, Polyline, XyPoint};

use crate::graph::{GraphCosts, LinkGraph};
use crate::index::LinkIndex;
use crate::link::LinkStore;
use crate::SpatialResult;

pub struct Network {
    store: LinkStore,
    graph: LinkGraph,
    index: LinkIndex,
    baseline_cost: Arc<[f64]>,
}

impl Network {
    /// Build the graph, the spatial index, and capture the baseline cost
    /// vector (one cell per link, its metric length).
    pub fn new(store: LinkStore) -> Network {
        let graph = LinkGraph::build(&store);
        let index = LinkIndex::build(&store);
        let baseline_cost: Arc<[f64]> =
            store.iter().map(|l| store.length_m(l)).collect::<Vec<_>>().into();
        Network { store, graph, index, baseline_cost }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Every link within `max_distance` metres of `point`, sorted ascending
    /// by distance with ties broken by the lower external link id.
    pub fn nearest_links(&self, point: XyPoint, max_distance: f64) -> Vec<(LinkIdx, f64)> {
        let mut found = self.index.nearest_within(point, max_distance);
        found.sort_by(|a, b| {
            a.1.total_cmp(&b.1)
                .then_with(|| self.store.id(a.0).cmp(&self.store.id(b.0)))
        });
        found
    }

    // ── Link accessors ────────────────────────────────────────────────────

    #[inline]
    pub fn link_bearing(&self, link: LinkIdx) -> f64 {
        self.store.bearing(link)
    }

    #[inline]
    pub fn link_endpoints(&self, link: LinkIdx) -> (NodeId, NodeId) {
        self.store.endpoints(link)
    }

    #[inline]
    pub fn link_geometry(&self, link: LinkIdx) -> &Polyline {
        self.store.geometry(link)
    }

    #[inline]
    pub fn link_id(&self, link: LinkIdx) -> LinkId {
        self.store.id(link)
    }

    pub fn link_idx(&self, id: LinkId) -> Option<LinkIdx> {
        self.store.idx(id)
    }

    pub fn store(&self) -> &LinkStore {
        &self.store
    }

    pub fn graph(&self) -> &LinkGraph {
        &self.graph
    }

    // ── Speed filter ──────────────────────────────────────────────────────

    /// Select the per-link speed-cap column used by candidate filtering.
    pub fn set_speed_field(&mut self, name: &str) -> SpatialResult<()> {
        self.store.set_speed_field(name)
    }

    pub fn speed_cap(&self, link: LinkIdx) -> Option<f64> {
        self.store.speed_cap(link)
    }

    // ── Cost state ────────────────────────────────────────────────────────

    /// A fresh scratch cost overlay seeded with the baseline.  One per
    /// driver/worker; see [`GraphCosts`].
    pub fn cost_overlay(&self) -> GraphCosts {
        GraphCosts::new(Arc::clone(&self.baseline_cost))
    }
}
