//! A single candidate bus line: an ordered walk over the stop graph.
//!
//! Routes are immutable once constructed.  The genetic operators never edit
//! a route in place — mutation and crossover replace whole routes — so the
//! cached traversal length can never go stale, and two individuals can
//! never observe each other's genes changing.

use rustc_hash::FxHashSet;

use tn_core::NodeId;
use tn_network::StopGraph;

use crate::{GaError, GaResult};

/// An ordered sequence of adjacent stops with a cached traversal length.
///
/// The node list is a walk: every consecutive pair is linked in the graph
/// (checked at construction).  Terminals may appear more than once; inner
/// nodes never do — [`crate::RouteBuilder`] guarantees this for generated
/// routes, and the fitness evaluator relies on first occurrences only.
#[derive(Debug, Clone)]
pub struct Route {
    label: String,
    nodes: Vec<NodeId>,
    length_m: f64,
}

impl Route {
    /// Build a route from an explicit node sequence, computing its length.
    ///
    /// Fails with `MissingLink` when two consecutive nodes are not adjacent
    /// in `graph`, and with `Config` when the sequence is empty.
    pub fn new(
        label: impl Into<String>,
        nodes: Vec<NodeId>,
        graph: &StopGraph,
    ) -> GaResult<Self> {
        if nodes.is_empty() {
            return Err(GaError::Config("a route needs at least one node".into()));
        }
        let length_m = traversal_length(&nodes, graph)?;
        Ok(Route { label: label.into(), nodes, length_m })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total traversal length in metres, cached at construction.
    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    pub fn first(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn last(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Position of the first occurrence of `node`.
    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    /// In-vehicle time between two stops served by this route, in seconds.
    ///
    /// The distance is summed along the route between the first occurrences
    /// of the two stops (in either order — the line is traversed both
    /// ways).  Returns `None` when either stop is not on the route; `0.0`
    /// when both name the same position.
    pub fn time_between(
        &self,
        a: NodeId,
        b: NodeId,
        graph: &StopGraph,
        average_speed: f64,
    ) -> Option<f64> {
        let i = self.position_of(a)?;
        let j = self.position_of(b)?;
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };

        let mut distance = 0.0f64;
        for pair in self.nodes[lo..=hi].windows(2) {
            // Adjacency was checked at construction.
            distance += graph.link_distance(pair[0], pair[1]).ok()? as f64;
        }
        Some(distance / average_speed)
    }

    /// Stops shared with `other`, in this route's order, without repeats.
    pub fn common_nodes(&self, other: &Route) -> Vec<NodeId> {
        let theirs: FxHashSet<NodeId> = other.nodes.iter().copied().collect();
        let mut seen = FxHashSet::default();
        self.nodes
            .iter()
            .copied()
            .filter(|n| theirs.contains(n) && seen.insert(*n))
            .collect()
    }

    /// `true` if both routes visit exactly the same node sequence.
    /// Labels are ignored: two genes are duplicates by geometry, not name.
    pub fn same_path(&self, other: &Route) -> bool {
        self.nodes == other.nodes
    }
}

fn traversal_length(nodes: &[NodeId], graph: &StopGraph) -> GaResult<f64> {
    let mut total = 0.0f64;
    for pair in nodes.windows(2) {
        total += graph.link_distance(pair[0], pair[1])? as f64;
    }
    Ok(total)
}
