//! Routing trait, default Dijkstra implementation, and the fewest-hop
//! fallback.
//!
//! # Pluggability
//!
//! The resolver calls routing via the [`Router`] trait, so alternative
//! search strategies (A*, bidirectional) can be swapped in without touching
//! the cache or the scheduler.  Costs are supplied per call as a slice
//! indexed by `EdgeId`: one materialized view per rider profile.
//!
//! Edges whose cost is not finite are treated as impassable.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use cs_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order, origin first, destination last.
    pub nodes: Vec<NodeId>,
    /// Directed edges traversed; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Sum of the per-edge costs along the route.
    pub total_cost: f64,
}

impl Route {
    fn trivial(node: NodeId) -> Self {
        Route { nodes: vec![node], edges: Vec::new(), total_cost: 0.0 }
    }

    /// `true` if origin and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to` minimizing the sum of `costs`.
    ///
    /// `from == to` yields a trivial one-node route rather than an error.
    fn route(
        &self,
        network: &RoadNetwork,
        costs:   &[f64],
        from:    NodeId,
        to:      NodeId,
    ) -> SpatialResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        costs:   &[f64],
        from:    NodeId,
        to:      NodeId,
    ) -> SpatialResult<Route> {
        check_endpoints(network, from, to)?;
        dijkstra(network, costs, from, to)
    }
}

/// Heap key: `f64` with a total order.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn check_endpoints(network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<()> {
    if !network.contains(from) {
        return Err(SpatialError::NodeNotFound(from));
    }
    if !network.contains(to) {
        return Err(SpatialError::NodeNotFound(to));
    }
    Ok(())
}

fn dijkstra(network: &RoadNetwork, costs: &[f64], from: NodeId, to: NodeId) -> SpatialResult<Route> {
    if from == to {
        return Ok(Route::trivial(from));
    }

    let n = network.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    dist[from.index()] = 0.0;

    // Secondary key NodeId gives deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let w = costs.get(edge.index()).copied().unwrap_or(f64::INFINITY);
            if !w.is_finite() {
                continue;
            }
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + w.max(0.0);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(network: &RoadNetwork, prev_edge: &[EdgeId], from: NodeId, to: NodeId, total_cost: f64) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));
    Route { nodes, edges, total_cost }
}

// ── Fallback ──────────────────────────────────────────────────────────────────

/// Breadth-first search for the route with the fewest edges, ignoring all
/// profile costs.  `total_cost` is the hop count.
pub fn fewest_hops(network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
    check_endpoints(network, from, to)?;
    if from == to {
        return Ok(Route::trivial(from));
    }

    let n = network.node_count();
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut seen = vec![false; n];
    seen[from.index()] = true;
    let mut queue = VecDeque::from([from]);

    while let Some(node) = queue.pop_front() {
        for (edge, next) in network.neighbors(node) {
            if seen[next.index()] {
                continue;
            }
            seen[next.index()] = true;
            prev_edge[next.index()] = edge;
            if next == to {
                let mut route = reconstruct(network, &prev_edge, from, to, 0.0);
                route.total_cost = route.hop_count() as f64;
                return Ok(route);
            }
            queue.push_back(next);
        }
    }

    Err(SpatialError::NoRoute { from, to })
}
