//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Roads are unordered pairs; each is stored as two directed edges, the
//! reverse one carrying the negated slope.  All edge arrays are sorted by
//! source node and indexed by `EdgeId`, so a node's neighbourhood is a
//! contiguous scan for Dijkstra's inner loop.
//!
//! The network is immutable once built.  Reloading a scenario means building
//! a new `RoadNetwork` and invalidating every route cache that referred to
//! the old one.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use cs_core::{EdgeId, GeoPoint, NodeId, Point2};

use crate::attribute::{AttributeRanges, EdgeAttributes};
use crate::layout;
use crate::{SpatialError, SpatialResult};

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph in CSR form, with per-edge attributes and the
/// pre-computed attribute range table.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadNetworkBuilder`].
#[derive(Debug)]
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// External name of each node (as used by loaders and route tables).
    pub node_label: Vec<String>,

    /// Layout position of each node in metres.  Opaque to routing.
    pub node_pos: Vec<Point2>,

    /// Geographic coordinate, when the input supplied one.
    pub node_geo: Vec<Option<GeoPoint>>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,
    pub edge_attrs: Vec<EdgeAttributes>,

    ranges: AttributeRanges,
    labels: FxHashMap<String, NodeId>,
}

impl RoadNetwork {
    /// Construct an empty network.  It fails [`validate`](Self::validate).
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of directed edges (twice the number of roads).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn road_count(&self) -> usize {
        self.edge_to.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count() as u32).map(NodeId)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// `(edge, neighbour)` pairs reachable in one hop from `node`.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId)> + '_ {
        self.out_edges(node).map(|e| (e, self.edge_to[e.index()]))
    }

    /// The directed edge `from → to`, if the two nodes are adjacent.
    /// Parallel roads resolve to the shortest one.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if !self.contains(from) {
            return None;
        }
        self.out_edges(from)
            .filter(|e| self.edge_to[e.index()] == to)
            .min_by(|a, b| {
                self.edge_attrs[a.index()]
                    .distance_m
                    .total_cmp(&self.edge_attrs[b.index()].distance_m)
            })
    }

    #[inline]
    pub fn attrs(&self, edge: EdgeId) -> &EdgeAttributes {
        &self.edge_attrs[edge.index()]
    }

    /// The `(min, max)` range table built at load time.
    #[inline]
    pub fn ranges(&self) -> &AttributeRanges {
        &self.ranges
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> Point2 {
        self.node_pos[node.index()]
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.node_label[node.index()]
    }

    pub fn node_by_label(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).copied()
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Number of connected components (BFS over the undirected graph).
    pub fn component_count(&self) -> usize {
        let n = self.node_count();
        let mut seen = vec![false; n];
        let mut components = 0;
        let mut queue = VecDeque::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            queue.push_back(NodeId(start as u32));
            while let Some(node) = queue.pop_front() {
                for (_, next) in self.neighbors(node) {
                    if !seen[next.index()] {
                        seen[next.index()] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        components
    }

    pub fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }

    /// Reject graphs a simulation cannot run on: fewer than two nodes, no
    /// roads, or any edge without a positive finite length.  With
    /// `require_connected`, more than one component is rejected as well.
    pub fn validate(&self, require_connected: bool) -> SpatialResult<()> {
        if self.node_count() < 2 {
            return Err(SpatialError::InvalidGraph(format!(
                "network needs at least 2 nodes, has {}",
                self.node_count()
            )));
        }
        if self.edge_count() == 0 {
            return Err(SpatialError::InvalidGraph("network has no roads".into()));
        }
        for (i, attrs) in self.edge_attrs.iter().enumerate() {
            if !attrs.distance_m.is_finite() || attrs.distance_m <= 0.0 {
                return Err(SpatialError::InvalidGraph(format!(
                    "road {} -> {} has non-positive distance {}",
                    self.label(self.edge_from[i]),
                    self.label(self.edge_to[i]),
                    attrs.distance_m
                )));
            }
        }
        if require_connected {
            let components = self.component_count();
            if components > 1 {
                return Err(SpatialError::Disconnected { components });
            }
        }
        Ok(())
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use cs_spatial::{EdgeAttributes, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node("A");
/// let c = b.add_node("C");
/// b.add_road(a, c, EdgeAttributes::with_distance(1_200.0));
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // both directions
/// ```
pub struct RoadNetworkBuilder {
    nodes:       Vec<RawNode>,
    raw_roads:   Vec<RawRoad>,
    layout_seed: u64,
}

struct RawNode {
    label: String,
    pos:   Option<Point2>,
    geo:   Option<GeoPoint>,
}

struct RawRoad {
    a:     NodeId,
    b:     NodeId,
    attrs: EdgeAttributes,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    attrs: EdgeAttributes,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_roads: Vec::new(), layout_seed: 0 }
    }

    pub fn with_capacity(nodes: usize, roads: usize) -> Self {
        Self {
            nodes:       Vec::with_capacity(nodes),
            raw_roads:   Vec::with_capacity(roads),
            layout_seed: 0,
        }
    }

    /// Seed for the force-directed layout used when nodes carry neither
    /// explicit positions nor coordinates.
    pub fn layout_seed(mut self, seed: u64) -> Self {
        self.layout_seed = seed;
        self
    }

    /// Add a node without a position; the layout step places it.
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        self.push_node(label.into(), None, None)
    }

    /// Add a node at an explicit planar position (metres).
    pub fn add_node_at(&mut self, label: impl Into<String>, pos: Point2) -> NodeId {
        self.push_node(label.into(), Some(pos), None)
    }

    /// Add a node with geographic coordinates.  Roads between two such nodes
    /// take their length from the Haversine distance.
    pub fn add_geo_node(&mut self, label: impl Into<String>, geo: GeoPoint) -> NodeId {
        self.push_node(label.into(), None, Some(geo))
    }

    fn push_node(&mut self, label: String, pos: Option<Point2>, geo: Option<GeoPoint>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(RawNode { label, pos, geo });
        id
    }

    /// Add an undirected road between `a` and `b`.  `attrs.slope_pct` is the
    /// grade going from `a` to `b`.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttributes) {
        self.raw_roads.push(RawRoad { a, b, attrs });
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn road_count(&self) -> usize { self.raw_roads.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Roads referencing unknown nodes are dropped; `validate()` on the
    /// result catches graphs left empty by that.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        // Expand roads into directed edges, deriving geographic lengths.
        let mut raw: Vec<RawEdge> = Vec::with_capacity(self.raw_roads.len() * 2);
        for road in &self.raw_roads {
            if road.a.index() >= node_count || road.b.index() >= node_count {
                continue;
            }
            let mut attrs = road.attrs;
            if let (Some(ga), Some(gb)) = (self.nodes[road.a.index()].geo, self.nodes[road.b.index()].geo) {
                attrs.distance_m = ga.distance_m(gb);
            }
            raw.push(RawEdge { from: road.a, to: road.b, attrs });
            raw.push(RawEdge { from: road.b, to: road.a, attrs: attrs.reversed() });
        }

        // Stable sort keeps insertion order within a node's neighbourhood.
        raw.sort_by_key(|e| e.from.0);

        let edge_from:  Vec<NodeId>         = raw.iter().map(|e| e.from).collect();
        let edge_to:    Vec<NodeId>         = raw.iter().map(|e| e.to).collect();
        let edge_attrs: Vec<EdgeAttributes> = raw.iter().map(|e| e.attrs).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_to.len());

        let ranges = AttributeRanges::from_edges(&edge_attrs);

        let explicit: Vec<Option<Point2>>   = self.nodes.iter().map(|n| n.pos).collect();
        let node_geo: Vec<Option<GeoPoint>> = self.nodes.iter().map(|n| n.geo).collect();
        let pairs: Vec<(usize, usize)> = self
            .raw_roads
            .iter()
            .filter(|r| r.a.index() < node_count && r.b.index() < node_count)
            .map(|r| (r.a.index(), r.b.index()))
            .collect();
        let node_pos = layout::resolve_positions(&explicit, &node_geo, &pairs, self.layout_seed);

        let mut labels = FxHashMap::with_capacity_and_hasher(node_count, Default::default());
        let mut node_label = Vec::with_capacity(node_count);
        for (i, n) in self.nodes.into_iter().enumerate() {
            labels.entry(n.label.clone()).or_insert(NodeId(i as u32));
            node_label.push(n.label);
        }

        RoadNetwork {
            node_label,
            node_pos,
            node_geo,
            node_out_start,
            edge_from,
            edge_to,
            edge_attrs,
            ranges,
            labels,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
