//! Run parameters for the genetic search and the fitness objective.
//!
//! Both structs are plain data validated once at the boundary
//! ([`GaParams::validate`], [`FitnessParams::validate`]); the algorithm
//! crates assume validated values and never re-check.

use crate::{CoreError, CoreResult};

// ── GaParams ──────────────────────────────────────────────────────────────────

/// Parameters of the population-level search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaParams {
    /// Number of individuals after every generation transition.
    pub population_size: usize,

    /// Fraction of each generation replaced by mutated copies, in [0, 1].
    pub mutation_rate: f64,

    /// Number of routes (genes) per individual.  Constant for the whole run.
    pub num_routes: usize,

    /// Hard cap on the number of nodes in one route.
    pub max_route_nodes: usize,

    /// When `true`, a route must end at a terminal distinct from its start;
    /// reaching `max_route_nodes` forces a backtrack.  When `false`, a route
    /// hitting the cap is accepted as-is.
    pub only_terminal_ending: bool,

    /// Maximum number of full walk attempts before route generation gives
    /// up with `RouteGenerationExhausted`.
    pub max_route_attempts: usize,

    /// Number of generation transitions to run.
    pub generations: u32,

    /// Seed of the run's single random source.
    pub seed: u64,
}

impl GaParams {
    /// Check internal consistency.  Call once before starting a run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.population_size < 4 {
            return Err(CoreError::Config(format!(
                "population_size must be at least 4, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(CoreError::Config(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if self.num_routes == 0 {
            return Err(CoreError::Config("num_routes must be positive".into()));
        }
        if self.max_route_nodes < 2 {
            return Err(CoreError::Config(format!(
                "max_route_nodes must be at least 2, got {}",
                self.max_route_nodes
            )));
        }
        if self.max_route_attempts == 0 {
            return Err(CoreError::Config("max_route_attempts must be positive".into()));
        }
        Ok(())
    }
}

// ── FitnessParams ─────────────────────────────────────────────────────────────

/// Shape parameters of the three bounded quadratic penalty terms plus the
/// physical constants needed to turn route distances into travel times.
///
/// K1/K2/K3 are the ceilings of the time-quality, transfer-quality, and
/// coverage terms; an individual serving every pair directly at
/// shortest-path time scores exactly `K1 + K2 + K3`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessParams {
    /// Ceiling of the travel-time term F1.
    pub k1: f64,
    /// Ceiling of the transfer-ratio term F2.
    pub k2: f64,
    /// Ceiling of the coverage term F3.
    pub k3: f64,
    /// Time-deviation threshold of F1, in seconds: pairs slower than the
    /// shortest path by more than `xm` contribute nothing.
    pub xm: f64,
    /// Fixed time cost of one transfer, in seconds.
    pub transfer_time_s: f64,
    /// Average commercial speed used to convert distances to in-vehicle
    /// times, in metres per second.
    pub average_speed: f64,
}

impl FitnessParams {
    /// Check internal consistency.  Call once before starting a run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.k1 < 0.0 || self.k2 < 0.0 || self.k3 < 0.0 {
            return Err(CoreError::Config(
                "penalty ceilings K1/K2/K3 must be non-negative".into(),
            ));
        }
        if self.xm <= 0.0 {
            return Err(CoreError::Config(format!(
                "xm must be positive, got {}",
                self.xm
            )));
        }
        if self.transfer_time_s < 0.0 {
            return Err(CoreError::Config(format!(
                "transfer_time_s must be non-negative, got {}",
                self.transfer_time_s
            )));
        }
        if self.average_speed <= 0.0 {
            return Err(CoreError::Config(format!(
                "average_speed must be positive, got {}",
                self.average_speed
            )));
        }
        Ok(())
    }
}
