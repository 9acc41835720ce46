//! Stop graph representation and builder.
//!
//! # Data layout
//!
//! Transit design graphs are small (tens of stops), so adjacency is stored
//! the way the network description expresses it: one `Vec<StopLink>` per
//! node, in description order.  A node knows its outgoing links only; the
//! loader adds both directions when the description lists them.
//!
//! Terminals are ordinary nodes flagged at build time; they are the only
//! places a route may start, and (policy permitting) the only places it may
//! end.

use rustc_hash::FxHashMap;

use tn_core::{GeoPoint, NodeId};

use crate::{NetworkError, NetworkResult};

// ── StopLink ──────────────────────────────────────────────────────────────────

/// A directed link from one stop to a neighboring stop.
#[derive(Debug, Clone)]
pub struct StopLink {
    /// Target stop.
    pub to: NodeId,
    /// Physical length of the link in metres.
    pub distance_m: f32,
    /// Intermediate geometry between the two stops, for shape export.
    /// Empty when the description carries none; the link is then drawn as a
    /// straight segment.
    pub shape: Vec<GeoPoint>,
}

// ── StopNode ──────────────────────────────────────────────────────────────────

/// One stop of the network.  Immutable once the graph is built.
#[derive(Debug, Clone)]
pub struct StopNode {
    pub id: NodeId,
    pub label: String,
    pub pos: GeoPoint,
    /// `true` if routes may start (and are required to end) here.
    pub is_terminal: bool,
    /// Outgoing links, in description order.
    pub links: Vec<StopLink>,
}

impl StopNode {
    /// The link from this stop to `to`, if the stops are adjacent.
    pub fn link_to(&self, to: NodeId) -> Option<&StopLink> {
        self.links.iter().find(|l| l.to == to)
    }

    /// Number of outgoing links.
    pub fn degree(&self) -> usize {
        self.links.len()
    }
}

// ── StopGraph ─────────────────────────────────────────────────────────────────

/// The read-only stop graph: all stops plus the distinguished terminal set.
///
/// Construct via [`StopGraphBuilder`] or [`crate::load_graph_json`]; shared
/// immutably by route generation, fitness evaluation, and export.
pub struct StopGraph {
    nodes: Vec<StopNode>,
    terminals: Vec<NodeId>,
    labels: FxHashMap<String, NodeId>,
}

impl StopGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All stops, indexed by `NodeId`.
    pub fn nodes(&self) -> &[StopNode] {
        &self.nodes
    }

    /// The terminal IDs, in description order.
    pub fn terminals(&self) -> &[NodeId] {
        &self.terminals
    }

    /// Look up a stop, failing with `NodeNotFound` for out-of-range IDs.
    pub fn node(&self, id: NodeId) -> NetworkResult<&StopNode> {
        self.nodes
            .get(id.index())
            .ok_or(NetworkError::NodeNotFound(id))
    }

    /// Look up a stop without the error path.
    pub fn get(&self, id: NodeId) -> Option<&StopNode> {
        self.nodes.get(id.index())
    }

    /// Look up a stop by its label.
    pub fn by_label(&self, label: &str) -> Option<&StopNode> {
        self.labels.get(label).and_then(|&id| self.get(id))
    }

    /// `true` if `id` names a terminal.  Out-of-range IDs are not terminals.
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.is_terminal)
    }

    /// `true` if `id` resolves to a stop.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Outgoing links of `id`.  Empty slice for out-of-range IDs.
    pub fn links(&self, id: NodeId) -> &[StopLink] {
        self.get(id).map_or(&[], |n| n.links.as_slice())
    }

    /// Link length between two adjacent stops.
    ///
    /// Fails with `MissingLink` when the stops are not adjacent — callers
    /// hold node sequences that are walks over this graph, so a miss is a
    /// contract violation, not a reachable runtime state.
    pub fn link_distance(&self, from: NodeId, to: NodeId) -> NetworkResult<f32> {
        self.node(from)?
            .link_to(to)
            .map(|l| l.distance_m)
            .ok_or(NetworkError::MissingLink { from, to })
    }
}

// ── StopGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`StopGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts stops and directed links in any order.  `build()`
/// validates the whole structure: link endpoints must exist, labels must be
/// unique, and distances must be non-negative.
///
/// # Example
///
/// ```
/// use tn_core::GeoPoint;
/// use tn_network::StopGraphBuilder;
///
/// let mut b = StopGraphBuilder::new();
/// let t = b.add_terminal("T", GeoPoint::new(-23.55, -46.73));
/// let a = b.add_stop("A", GeoPoint::new(-23.56, -46.73));
/// b.link(t, a, 400.0);
/// let graph = b.build().unwrap();
/// assert!(graph.is_terminal(t));
/// assert_eq!(graph.link_distance(a, t).unwrap(), 400.0);
/// ```
pub struct StopGraphBuilder {
    nodes: Vec<StopNode>,
    raw_links: Vec<RawLink>,
}

struct RawLink {
    from: NodeId,
    to: NodeId,
    distance_m: f32,
    shape: Vec<GeoPoint>,
}

impl StopGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_links: Vec::new() }
    }

    /// Add a regular stop and return its `NodeId` (sequential from 0).
    pub fn add_stop(&mut self, label: impl Into<String>, pos: GeoPoint) -> NodeId {
        self.push_node(label.into(), pos, false)
    }

    /// Add a terminal stop and return its `NodeId`.
    pub fn add_terminal(&mut self, label: impl Into<String>, pos: GeoPoint) -> NodeId {
        self.push_node(label.into(), pos, true)
    }

    fn push_node(&mut self, label: String, pos: GeoPoint, is_terminal: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(StopNode { id, label, pos, is_terminal, links: Vec::new() });
        id
    }

    /// Add a **directed** link from `from` to `to`.
    pub fn link_directed(&mut self, from: NodeId, to: NodeId, distance_m: f32) {
        self.link_directed_with_shape(from, to, distance_m, Vec::new());
    }

    /// Directed link with intermediate geometry for shape export.
    pub fn link_directed_with_shape(
        &mut self,
        from: NodeId,
        to: NodeId,
        distance_m: f32,
        shape: Vec<GeoPoint>,
    ) {
        self.raw_links.push(RawLink { from, to, distance_m, shape });
    }

    /// Convenience: add links in **both directions** for an undirected
    /// street segment (the common case).
    pub fn link(&mut self, a: NodeId, b: NodeId, distance_m: f32) {
        self.link_directed(a, b, distance_m);
        self.link_directed(b, a, distance_m);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Consume the builder and produce a validated [`StopGraph`].
    pub fn build(self) -> NetworkResult<StopGraph> {
        let mut nodes = self.nodes;
        let node_count = nodes.len();

        // Labels must be unique — demand and export address stops by them.
        let mut labels: FxHashMap<String, NodeId> = FxHashMap::default();
        for node in &nodes {
            if labels.insert(node.label.clone(), node.id).is_some() {
                return Err(NetworkError::DuplicateLabel(node.label.clone()));
            }
        }

        for raw in self.raw_links {
            if raw.from.index() >= node_count {
                return Err(NetworkError::NodeNotFound(raw.from));
            }
            if raw.to.index() >= node_count {
                return Err(NetworkError::NodeNotFound(raw.to));
            }
            if raw.distance_m < 0.0 || !raw.distance_m.is_finite() {
                return Err(NetworkError::Config(format!(
                    "link {} -> {} has invalid distance {}",
                    raw.from, raw.to, raw.distance_m
                )));
            }
            nodes[raw.from.index()].links.push(StopLink {
                to: raw.to,
                distance_m: raw.distance_m,
                shape: raw.shape,
            });
        }

        let terminals: Vec<NodeId> = nodes
            .iter()
            .filter(|n| n.is_terminal)
            .map(|n| n.id)
            .collect();

        Ok(StopGraph { nodes, terminals, labels })
    }
}

impl Default for StopGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
