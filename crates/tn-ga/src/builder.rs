//! Constrained stochastic route generation.
//!
//! A route is grown by a randomized depth-first walk: start at a uniformly
//! random terminal, repeatedly append a uniformly random *valid* neighbor,
//! stop on reaching a different terminal.  A node with no valid
//! continuation is a dead end: it is removed, recorded as denied from its
//! predecessor's position, and the walk resumes one step back.  An attempt
//! that backtracks past its starting terminal is discarded and the walk
//! restarts fresh, up to `max_route_attempts` times.
//!
//! Valid neighbor = not already on the path (terminals excepted — a line
//! may pass through or return to a terminal) and not denied at the current
//! position.
//!
//! The walk is iterative: the backtracking state is an explicit pair of
//! parallel stacks (`path`, `denied`), one denied set per path position,
//! discarded when the route is finalized.

use rustc_hash::FxHashSet;

use tn_core::{GaParams, GaRng, NodeId};
use tn_network::StopGraph;

use crate::route::Route;
use crate::{GaError, GaResult};

/// Generates valid [`Route`]s over a borrowed graph.
///
/// Holds no mutable state of its own; all randomness comes from the
/// `GaRng` passed to [`build`](Self::build).
pub struct RouteBuilder<'a> {
    graph: &'a StopGraph,
    max_nodes: usize,
    only_terminal_ending: bool,
    max_attempts: usize,
}

impl<'a> RouteBuilder<'a> {
    /// Fails with `Config` when the graph cannot yield a valid route:
    /// no terminals at all, or a single terminal while routes are required
    /// to end at a terminal distinct from their start.
    pub fn new(graph: &'a StopGraph, params: &GaParams) -> GaResult<Self> {
        if graph.terminals().is_empty() {
            return Err(GaError::Config("graph has no terminals to start routes from".into()));
        }
        if params.only_terminal_ending && graph.terminals().len() < 2 {
            return Err(GaError::Config(
                "only_terminal_ending requires at least two terminals".into(),
            ));
        }
        Ok(RouteBuilder {
            graph,
            max_nodes: params.max_route_nodes,
            only_terminal_ending: params.only_terminal_ending,
            max_attempts: params.max_route_attempts,
        })
    }

    pub fn graph(&self) -> &'a StopGraph {
        self.graph
    }

    /// Produce one valid route, retrying failed walks up to the attempt
    /// bound.
    pub fn build(&self, label: impl Into<String>, rng: &mut GaRng) -> GaResult<Route> {
        let label = label.into();
        for _ in 0..self.max_attempts {
            if let Some(nodes) = self.attempt(rng) {
                return Route::new(label, nodes, self.graph);
            }
        }
        Err(GaError::RouteGenerationExhausted { attempts: self.max_attempts })
    }

    /// One full walk.  `None` means the walk backtracked to empty.
    fn attempt(&self, rng: &mut GaRng) -> Option<Vec<NodeId>> {
        let start = *rng.choose(self.graph.terminals())?;
        let mut path: Vec<NodeId> = vec![start];
        let mut denied: Vec<FxHashSet<NodeId>> = vec![FxHashSet::default()];

        loop {
            // Length cap: accept as an intermediate ending if policy allows,
            // otherwise treat like a dead end.
            if path.len() >= self.max_nodes {
                if !self.only_terminal_ending {
                    return Some(path);
                }
                if !backtrack(&mut path, &mut denied) {
                    return None;
                }
                continue;
            }

            let last = path[path.len() - 1];
            let frame = &denied[denied.len() - 1];
            let candidates: Vec<NodeId> = self
                .graph
                .links(last)
                .iter()
                .map(|l| l.to)
                .filter(|&n| {
                    (self.graph.is_terminal(n) || !path.contains(&n)) && !frame.contains(&n)
                })
                .collect();

            match rng.choose(&candidates) {
                Some(&next) => {
                    path.push(next);
                    denied.push(FxHashSet::default());
                    if self.graph.is_terminal(next) && next != path[0] {
                        return Some(path);
                    }
                }
                None => {
                    if !backtrack(&mut path, &mut denied) {
                        return None;
                    }
                }
            }
        }
    }
}

/// Drop the dead-end tail node and deny it from its predecessor's position.
/// Returns `false` when the walk has backtracked past its start.
fn backtrack(path: &mut Vec<NodeId>, denied: &mut Vec<FxHashSet<NodeId>>) -> bool {
    let Some(dead) = path.pop() else { return false };
    denied.pop();
    match denied.last_mut() {
        Some(frame) => {
            frame.insert(dead);
            true
        }
        None => false,
    }
}
