//! Multi-objective fitness evaluation.
//!
//! For every demand pair the evaluator finds the best travel option the
//! individual's route set offers — direct on a shared route, or a single
//! transfer at a shared stop — then folds the per-pair outcomes into three
//! bounded quadratic penalty terms (Chakroborty-style):
//!
//! | Term | Measures                 | Ceiling |
//! |------|--------------------------|---------|
//! | F1   | travel-time quality      | K1      |
//! | F2   | transfer-ratio quality   | K2      |
//! | F3   | demand coverage          | K3      |
//!
//! A network serving all demand directly at shortest-path time scores
//! `K1 + K2 + K3`; a network serving nothing scores 0.  Each term guards
//! its demand denominator: no relevant demand means the term is 0.

use tn_core::FitnessParams;
use tn_core::NodeId;
use tn_network::{DemandMatrix, OdPair, ShortestPaths, StopGraph};

use crate::individual::{Individual, ServiceStats};

// ── PairService ───────────────────────────────────────────────────────────────

/// How one origin/destination pair is served by an individual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairService {
    /// One route carries the pair end to end.
    Direct { time_s: f64 },
    /// Two routes connected at a shared stop; `time_s` includes the fixed
    /// transfer cost.
    Transfer { time_s: f64 },
    /// No route combination serves the pair.
    Unattended,
}

impl PairService {
    /// In-vehicle time when attended.
    pub fn time_s(&self) -> Option<f64> {
        match *self {
            PairService::Direct { time_s } | PairService::Transfer { time_s } => Some(time_s),
            PairService::Unattended => None,
        }
    }

    pub fn is_attended(&self) -> bool {
        !matches!(self, PairService::Unattended)
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, PairService::Direct { .. })
    }
}

// ── FitnessEvaluator ──────────────────────────────────────────────────────────

/// Relative weight of directly served demand in the transfer index dT.
const DIRECT_WEIGHT: f64 = 3.0;
/// Relative weight of transfer-served demand in the transfer index dT.
const TRANSFER_WEIGHT: f64 = 1.0;

/// Scores individuals against one demand matrix.  Borrows everything, owns
/// nothing, draws no randomness — safe to share across worker threads.
pub struct FitnessEvaluator<'a> {
    graph: &'a StopGraph,
    demand: &'a DemandMatrix,
    shortest: &'a ShortestPaths,
    params: &'a FitnessParams,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(
        graph: &'a StopGraph,
        demand: &'a DemandMatrix,
        shortest: &'a ShortestPaths,
        params: &'a FitnessParams,
    ) -> Self {
        FitnessEvaluator { graph, demand, shortest, params }
    }

    /// Evaluate `individual`, memoized: when a fitness is already cached
    /// for the current gene set it is returned unchanged.
    ///
    /// Side effect: fills the individual's [`ServiceStats`].
    pub fn evaluate(&self, individual: &mut Individual) -> f64 {
        if let Some(cached) = individual.fitness() {
            return cached;
        }

        let outcomes: Vec<(OdPair, PairService)> = self
            .demand
            .pairs()
            .iter()
            .map(|&pair| (pair, self.service(individual, pair.origin, pair.destination)))
            .collect();

        let mut stats = ServiceStats::default();
        let f1 = self.eval_f1(&outcomes, &mut stats);
        let f2 = self.eval_f2(&outcomes, &mut stats);
        let f3 = self.eval_f3(&outcomes, &mut stats);

        let fitness = f1 + f2 + f3;
        individual.set_evaluation(fitness, stats);
        fitness
    }

    /// Best travel option for one pair across the individual's routes.
    ///
    /// Search order: minimum positive direct time over routes serving both
    /// stops; failing that, minimum transfer time over every
    /// (origin-route, destination-route) pair sharing a stop; failing
    /// that, unattended.
    pub fn service(
        &self,
        individual: &Individual,
        origin: NodeId,
        destination: NodeId,
    ) -> PairService {
        let origin_routes = individual.routes_with(origin);
        let destination_routes = individual.routes_with(destination);
        if origin_routes.is_empty() || destination_routes.is_empty() {
            return PairService::Unattended;
        }

        let genes = individual.genes();
        let speed = self.params.average_speed;

        // Direct: a route serving both stops.
        let mut best_direct: Option<f64> = None;
        for &i in &origin_routes {
            if !destination_routes.contains(&i) {
                continue;
            }
            if let Some(t) = genes[i].time_between(origin, destination, self.graph, speed) {
                if t > 0.0 && best_direct.is_none_or(|best| t < best) {
                    best_direct = Some(t);
                }
            }
        }
        if let Some(time_s) = best_direct {
            return PairService::Direct { time_s };
        }

        // One transfer: two distinct routes sharing a stop.
        let mut best_transfer: Option<f64> = None;
        for &oi in &origin_routes {
            for &di in &destination_routes {
                if oi == di {
                    continue;
                }
                for node in genes[oi].common_nodes(&genes[di]) {
                    let leg_in = genes[oi].time_between(origin, node, self.graph, speed);
                    let leg_out = genes[di].time_between(node, destination, self.graph, speed);
                    if let (Some(t1), Some(t2)) = (leg_in, leg_out) {
                        let total = t1 + t2 + self.params.transfer_time_s;
                        if best_transfer.is_none_or(|best| total < best) {
                            best_transfer = Some(total);
                        }
                    }
                }
            }
        }
        match best_transfer {
            Some(time_s) => PairService::Transfer { time_s },
            None => PairService::Unattended,
        }
    }

    // ── Objective terms ───────────────────────────────────────────────────

    /// F1 — travel-time quality over attended demand.
    ///
    /// For each attended pair, `x` is the excess over the shortest-path
    /// time; the pair contributes `f(x)` (a downward parabola worth K1 at
    /// `x = 0` and 0 beyond `xm`), demand-weighted.
    fn eval_f1(&self, outcomes: &[(OdPair, PairService)], stats: &mut ServiceStats) -> f64 {
        let k1 = self.params.k1;
        let xm = self.params.xm;
        // -K1/xm <= b1 <= 0
        let b1 = -k1 / (2.0 * xm);

        let mut attended_demand = 0.0;
        let mut accumulated_f = 0.0;
        let mut accumulated_time = 0.0;

        for (pair, service) in outcomes {
            let Some(time) = service.time_s() else { continue };
            attended_demand += pair.demand;
            accumulated_time += time * pair.demand;

            let best = self
                .shortest
                .time_between(pair.origin, pair.destination)
                .unwrap_or(time);
            let x = time - best;
            let f = if x <= xm {
                -(b1 / xm + k1 / (xm * xm)) * x * x + b1 * x + k1
            } else {
                0.0
            };
            accumulated_f += f * pair.demand;
        }

        if attended_demand == 0.0 {
            return 0.0;
        }
        stats.mean_time_s = accumulated_time / attended_demand;
        accumulated_f / attended_demand
    }

    /// F2 — transfer-ratio quality.
    ///
    /// dT weighs direct demand `DIRECT_WEIGHT` against transfer demand
    /// `TRANSFER_WEIGHT`; the quadratic is shaped to reach K2 when all
    /// attended demand is direct.
    fn eval_f2(&self, outcomes: &[(OdPair, PairService)], stats: &mut ServiceStats) -> f64 {
        let k2 = self.params.k2;
        let a = DIRECT_WEIGHT;
        let b = TRANSFER_WEIGHT;
        // K2/a <= b2 <= 2*K2/a
        let b2 = 3.0 * k2 / (2.0 * a);

        let mut direct_demand = 0.0;
        let mut transfer_demand = 0.0;
        for (pair, service) in outcomes {
            match service {
                PairService::Direct { .. } => direct_demand += pair.demand,
                PairService::Transfer { .. } => transfer_demand += pair.demand,
                PairService::Unattended => {}
            }
        }

        let attended_demand = direct_demand + transfer_demand;
        if attended_demand == 0.0 {
            return 0.0;
        }
        stats.direct_share = direct_demand / attended_demand;
        stats.transfer_share = transfer_demand / attended_demand;

        let dt = (a * direct_demand + b * transfer_demand) / attended_demand;
        ((k2 - b2 * a) / (a * a)) * dt * dt + b2 * dt
    }

    /// F3 — coverage quality over total demand.
    ///
    /// Worth K3 when nothing is unattended, 0 when everything is.
    fn eval_f3(&self, outcomes: &[(OdPair, PairService)], stats: &mut ServiceStats) -> f64 {
        let k3 = self.params.k3;
        // -K3 <= b3 <= 0
        let b3 = -k3 / 2.0;

        let mut unattended_demand = 0.0;
        let mut total_demand = 0.0;
        for (pair, service) in outcomes {
            if !service.is_attended() {
                unattended_demand += pair.demand;
            }
            total_demand += pair.demand;
        }

        if total_demand == 0.0 {
            return 0.0;
        }
        let dun = unattended_demand / total_demand;
        stats.unattended_share = dun;
        -(b3 + k3) * dun * dun + b3 * dun + k3
    }
}
