//! Routing graph and the scratch cost overlay.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_*[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Every traversable direction of a link contributes one directed edge:
//! `Both` links appear twice (a→b with direction +1 and b→a with −1),
//! one-way links once.  Edge cost is looked up per **link** through a
//! [`GraphCosts`] overlay, so both directions of a link share one cost cell
//! and discounting a link biases the search either way along it.
//!
//! # Cost discipline
//!
//! The graph itself never owns mutable cost state.  Each match driver holds
//! its own `GraphCosts` cloned from the baseline (link lengths); `discount`
//! and `reset` are the only mutations anywhere, so concurrent workers can
//! share one `LinkGraph` read-only.

use std::sync::Arc;

use mm_core::{LinkIdx, NodeId};

use crate::link::{LinkDirection, LinkStore};

// ── LinkGraph ─────────────────────────────────────────────────────────────────

/// Directed CSR adjacency over the dense node set of a [`LinkStore`].
pub struct LinkGraph {
    node_count: usize,
    /// CSR row pointer.  Length = `node_count + 1`.
    node_out_start: Vec<u32>,
    /// Destination node of each directed edge.
    edge_to: Vec<NodeId>,
    /// The link each edge traverses.
    edge_link: Vec<LinkIdx>,
    /// +1 when the edge runs a→b along its link, −1 for b→a.
    edge_dir: Vec<i8>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    link: LinkIdx,
    dir: i8,
}

impl LinkGraph {
    /// Build the adjacency from a link store, honoring direction flags.
    pub fn build(store: &LinkStore) -> LinkGraph {
        let mut raw: Vec<RawEdge> = Vec::with_capacity(store.len() * 2);
        for link in store.iter() {
            let (a, b) = store.endpoints(link);
            match store.direction(link) {
                LinkDirection::Both => {
                    raw.push(RawEdge { from: a, to: b, link, dir: 1 });
                    raw.push(RawEdge { from: b, to: a, link, dir: -1 });
                }
                LinkDirection::Forward => raw.push(RawEdge { from: a, to: b, link, dir: 1 }),
                LinkDirection::Reverse => raw.push(RawEdge { from: b, to: a, link, dir: -1 }),
            }
        }

        let node_count = store.node_count();
        raw.sort_unstable_by_key(|e| e.from.0);

        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_link: Vec<LinkIdx> = raw.iter().map(|e| e.link).collect();
        let edge_dir: Vec<i8> = raw.iter().map(|e| e.dir).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        LinkGraph { node_count, node_out_start, edge_to, edge_link, edge_dir }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    /// Iterator over the edge indices of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = usize> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    #[inline]
    pub fn edge_to(&self, edge: usize) -> NodeId {
        self.edge_to[edge]
    }

    #[inline]
    pub fn edge_link(&self, edge: usize) -> LinkIdx {
        self.edge_link[edge]
    }

    #[inline]
    pub fn edge_dir(&self, edge: usize) -> i8 {
        self.edge_dir[edge]
    }
}

// ── GraphCosts ────────────────────────────────────────────────────────────────

/// Per-driver scratch cost vector, indexed by [`LinkIdx`].
///
/// Cloned cheaply from a shared baseline (`Arc<[f64]>` of link lengths).
/// [`discount`](Self::discount) and [`reset`](Self::reset) are the only two
/// legal mutations of routing cost in the whole workspace; `reset` restores
/// the baseline bit-for-bit.
#[derive(Clone)]
pub struct GraphCosts {
    baseline: Arc<[f64]>,
    current: Vec<f64>,
}

impl GraphCosts {
    pub fn new(baseline: Arc<[f64]>) -> Self {
        let current = baseline.to_vec();
        Self { baseline, current }
    }

    /// Multiply the scratch cost of each listed link by `factor`.
    ///
    /// Repeated calls are cumulative; the baseline is never touched.
    pub fn discount(&mut self, links: &[LinkIdx], factor: f64) {
        for &link in links {
            self.current[link.index()] *= factor;
        }
    }

    /// Restore the scratch costs to the baseline captured at construction.
    pub fn reset(&mut self) {
        self.current.copy_from_slice(&self.baseline);
    }

    #[inline]
    pub fn cost(&self, link: LinkIdx) -> f64 {
        self.current[link.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.current
    }

    pub fn baseline(&self) -> &[f64] {
        &self.baseline
    }
}
