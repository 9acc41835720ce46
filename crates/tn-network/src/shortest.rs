//! All-pairs shortest travel-time reference table.
//!
//! The time-quality fitness term compares each served pair's in-vehicle
//! time against the best the street network allows.  That reference is
//! computed once per run: Dijkstra from every node over integer millimetre
//! costs (exact comparisons, deterministic tie-break on `NodeId`), then
//! converted to seconds at the configured average speed.
//!
//! The table is dense (`n × n`); design graphs are tens of nodes, so the
//! quadratic footprint is irrelevant.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tn_core::NodeId;

use crate::graph::StopGraph;

/// Minimum achievable travel time between every ordered pair of stops.
pub struct ShortestPaths {
    n: usize,
    /// Row-major `n × n` seconds; `f64::INFINITY` = unreachable.
    time_s: Vec<f64>,
}

impl ShortestPaths {
    /// Run Dijkstra from every node of `graph`.
    ///
    /// `average_speed` is in metres per second and must be positive
    /// (validated by `FitnessParams::validate`).
    pub fn build(graph: &StopGraph, average_speed: f64) -> Self {
        let n = graph.node_count();
        let mut time_s = vec![f64::INFINITY; n * n];

        for source in 0..n {
            let dist_mm = dijkstra_mm(graph, NodeId(source as u32));
            for (target, &mm) in dist_mm.iter().enumerate() {
                if mm != u64::MAX {
                    time_s[source * n + target] = mm as f64 / 1000.0 / average_speed;
                }
            }
        }

        ShortestPaths { n, time_s }
    }

    /// Minimum travel time from `origin` to `destination` in seconds, or
    /// `None` when no path exists (or an ID is out of range).
    pub fn time_between(&self, origin: NodeId, destination: NodeId) -> Option<f64> {
        if origin.index() >= self.n || destination.index() >= self.n {
            return None;
        }
        let t = self.time_s[origin.index() * self.n + destination.index()];
        t.is_finite().then_some(t)
    }
}

/// Single-source shortest distances in millimetres; `u64::MAX` = unreached.
fn dijkstra_mm(graph: &StopGraph, from: NodeId) -> Vec<u64> {
    let n = graph.node_count();
    let mut dist = vec![u64::MAX; n];
    dist[from.index()] = 0;

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for link in graph.links(node) {
            let link_mm = (link.distance_m as f64 * 1000.0).round() as u64;
            let new_cost = cost.saturating_add(link_mm);
            if new_cost < dist[link.to.index()] {
                dist[link.to.index()] = new_cost;
                heap.push(Reverse((new_cost, link.to)));
            }
        }
    }

    dist
}
