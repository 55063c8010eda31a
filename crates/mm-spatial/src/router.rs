//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The match driver calls routing via the [`Router`] trait, so applications
//! can swap in custom engines (contraction hierarchies, A*) without touching
//! the matcher.  The default [`DijkstraRouter`] is sufficient for network
//! sizes the matcher targets.
//!
//! # Contract
//!
//! `compute_path` reads per-link cost from the caller's [`GraphCosts`]
//! overlay and stops as soon as the target node is settled (early exit).
//! An infeasible pair returns `None` — not an error; the driver skips that
//! leg.  Mileposts accumulate *physical* link length, never the discounted
//! cost, so results are unaffected by candidate biasing.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mm_core::{LinkIdx, NodeId};

use crate::graph::GraphCosts;
use crate::network::Network;

// ── PathLeg ───────────────────────────────────────────────────────────────────

/// One routed leg between two waypoints.
///
/// The three vectors are parallel: `mileposts[k]` is the cumulative metric
/// distance from the leg start after traversing `links[k]` in
/// `directions[k]` (+1 = a→b, −1 = b→a).
#[derive(Debug, Clone, Default)]
pub struct PathLeg {
    pub links: Vec<LinkIdx>,
    pub directions: Vec<i8>,
    pub mileposts: Vec<f64>,
}

impl PathLeg {
    /// `true` if the leg connects a node to itself.
    pub fn is_trivial(&self) -> bool {
        self.links.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one instance can serve all
/// worker threads; per-query mutable state belongs in locals.
pub trait Router: Send + Sync {
    /// Compute a cheapest path from `from` to `to` under `costs`.
    ///
    /// Returns `None` if no path exists; `from == to` yields an empty leg.
    fn compute_path(
        &self,
        network: &Network,
        costs: &GraphCosts,
        from: NodeId,
        to: NodeId,
    ) -> Option<PathLeg>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR link graph with early exit.
pub struct DijkstraRouter;

/// Heap entry: manual `Ord` turns `BinaryHeap` (a max-heap) into a min-heap
/// over f64 cost, with `NodeId` as a deterministic tie-break.
struct QueueEntry {
    cost: f64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: the heap pops the cheapest entry first.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Router for DijkstraRouter {
    fn compute_path(
        &self,
        network: &Network,
        costs: &GraphCosts,
        from: NodeId,
        to: NodeId,
    ) -> Option<PathLeg> {
        if from == to {
            return Some(PathLeg::default());
        }

        let graph = network.graph();
        let n = graph.node_count();
        if from.index() >= n || to.index() >= n {
            return None;
        }

        const NO_EDGE: usize = usize::MAX;

        // dist[v] = best known cost to reach v; prev[v] = edge that reached v.
        let mut dist = vec![f64::INFINITY; n];
        let mut prev_edge = vec![NO_EDGE; n];

        dist[from.index()] = 0.0;

        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry { cost: 0.0, node: from });

        while let Some(QueueEntry { cost, node }) = heap.pop() {
            if node == to {
                return Some(reconstruct(network, graph, &prev_edge, to));
            }

            // Skip stale heap entries.
            if cost > dist[node.index()] {
                continue;
            }

            for edge in graph.out_edges(node) {
                let neighbor = graph.edge_to(edge);
                let new_cost = cost + costs.cost(graph.edge_link(edge));

                if new_cost < dist[neighbor.index()] {
                    dist[neighbor.index()] = new_cost;
                    prev_edge[neighbor.index()] = edge;
                    heap.push(QueueEntry { cost: new_cost, node: neighbor });
                }
            }
        }

        None
    }
}

fn reconstruct(
    network: &Network,
    graph: &crate::graph::LinkGraph,
    prev_edge: &[usize],
    to: NodeId,
) -> PathLeg {
    let mut links: Vec<LinkIdx> = Vec::new();
    let mut directions: Vec<i8> = Vec::new();

    // Walk the predecessor chain back to the source (whose slot holds no
    // edge), then flip into travel order.
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == usize::MAX {
            break;
        }
        links.push(graph.edge_link(e));
        directions.push(graph.edge_dir(e));
        let (a, b) = network.link_endpoints(graph.edge_link(e));
        cur = if graph.edge_dir(e) > 0 { a } else { b };
    }
    links.reverse();
    directions.reverse();

    // Mileposts in true metres, independent of the discounted search cost.
    let mut mileposts = Vec::with_capacity(links.len());
    let mut walked = 0.0;
    for &link in &links {
        walked += network.store().length_m(link);
        mileposts.push(walked);
    }

    PathLeg { links, directions, mileposts }
}
