//! A candidate transit network: a fixed-size set of routes.

use tn_core::{GaRng, NodeId};

use crate::builder::RouteBuilder;
use crate::route::Route;
use crate::{GaError, GaResult};

// ── ServiceStats ──────────────────────────────────────────────────────────────

/// Demand-weighted service statistics recorded as a side effect of fitness
/// evaluation, for external reporting only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ServiceStats {
    /// Mean in-vehicle time over attended demand, in seconds.
    pub mean_time_s: f64,
    /// Share of attended demand served without a transfer.
    pub direct_share: f64,
    /// Share of attended demand served with one transfer.
    pub transfer_share: f64,
    /// Share of total demand not served at all.
    pub unattended_share: f64,
}

// ── Individual ────────────────────────────────────────────────────────────────

/// One member of the population: exactly `num_routes` routes (the genes),
/// plus the memoized fitness of that gene set.
///
/// `fitness` is `None` until evaluated and cleared whenever genes change;
/// the genetic operators never mutate genes in place, they build new
/// individuals, so clearing happens at construction.
#[derive(Debug, Clone)]
pub struct Individual {
    label: String,
    genes: Vec<Route>,
    fitness: Option<f64>,
    stats: ServiceStats,
}

impl Individual {
    /// Wrap an explicit gene set.  Fitness starts unevaluated.
    pub fn new(label: impl Into<String>, genes: Vec<Route>) -> Self {
        Individual {
            label: label.into(),
            genes,
            fitness: None,
            stats: ServiceStats::default(),
        }
    }

    /// Generate an individual with `num_routes` freshly built, pairwise
    /// distinct routes.  Positional gene labels are `"1"`, `"2"`, ….
    ///
    /// Duplicate routes are rejected and rebuilt; the rebuild loop shares
    /// the walk's attempt bound so a graph too small to yield `num_routes`
    /// distinct routes surfaces `RouteGenerationExhausted` instead of
    /// spinning.
    pub fn generate(
        label: impl Into<String>,
        builder: &RouteBuilder<'_>,
        num_routes: usize,
        max_attempts: usize,
        rng: &mut GaRng,
    ) -> GaResult<Self> {
        let mut genes: Vec<Route> = Vec::with_capacity(num_routes);
        let mut attempts = 0;

        while genes.len() < num_routes {
            let route = builder.build((genes.len() + 1).to_string(), rng)?;
            if genes.iter().any(|g| g.same_path(&route)) {
                attempts += 1;
                if attempts >= max_attempts {
                    return Err(GaError::RouteGenerationExhausted { attempts });
                }
                continue;
            }
            genes.push(route);
        }

        Ok(Individual::new(label, genes))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn genes(&self) -> &[Route] {
        &self.genes
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// The memoized fitness, or `None` when genes changed since the last
    /// evaluation.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    /// Record an evaluation result.  Only the evaluator calls this.
    pub(crate) fn set_evaluation(&mut self, fitness: f64, stats: ServiceStats) {
        self.fitness = Some(fitness);
        self.stats = stats;
    }

    /// Drop the memoized fitness.
    pub fn invalidate(&mut self) {
        self.fitness = None;
        self.stats = ServiceStats::default();
    }

    /// Indices of the genes whose route serves `node`.
    pub fn routes_with(&self, node: NodeId) -> Vec<usize> {
        self.genes
            .iter()
            .enumerate()
            .filter(|(_, route)| route.contains(node))
            .map(|(i, _)| i)
            .collect()
    }

    /// Deep copies of all genes, for building children.  Routes own their
    /// node storage, so the clones share nothing mutable with this
    /// individual.
    pub fn clone_genes(&self) -> Vec<Route> {
        self.genes.clone()
    }
}
