//! The population and its genetic operators.
//!
//! One generation transition is: evaluate → sort → [`Population::select`]
//! (elitist parent pool) → [`reproduce`] (crossover until the pool is
//! exhausted, then top up) → [`mutate`] a sampled fraction.  The operators
//! are pure over `&mut GaRng`: identical seeds give identical generations.

use tn_core::{GaParams, GaRng};

use crate::builder::RouteBuilder;
use crate::fitness::FitnessEvaluator;
use crate::individual::Individual;
use crate::route::Route;
use crate::GaResult;

/// Probability that crossover switches to the other parent between two
/// consecutive gene slots.  Above 1/2 to discourage same-parent streaks
/// and encourage gene mixing.
const ANTI_STREAK_SWITCH: f64 = 0.75;

// ── Population ────────────────────────────────────────────────────────────────

/// A multiset of individuals.  After every generation transition its size
/// equals the configured population size.
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Generate `params.population_size` fresh individuals labelled
    /// `"0"`, `"1"`, ….
    pub fn generate(
        builder: &RouteBuilder<'_>,
        params: &GaParams,
        rng: &mut GaRng,
    ) -> GaResult<Self> {
        let mut individuals = Vec::with_capacity(params.population_size);
        for i in 0..params.population_size {
            individuals.push(Individual::generate(
                i.to_string(),
                builder,
                params.num_routes,
                params.max_route_attempts,
                rng,
            )?);
        }
        Ok(Population { individuals })
    }

    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Population { individuals }
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Evaluate every individual (memoized per individual).
    #[cfg(not(feature = "parallel"))]
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator<'_>) {
        for individual in &mut self.individuals {
            evaluator.evaluate(individual);
        }
    }

    /// Evaluate every individual in parallel.  Evaluation draws no
    /// randomness, so the results match the sequential path exactly.
    #[cfg(feature = "parallel")]
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator<'_>) {
        use rayon::prelude::*;
        self.individuals
            .par_iter_mut()
            .for_each(|individual| {
                evaluator.evaluate(individual);
            });
    }

    /// Rank by descending fitness.  The sort is stable, so equal-fitness
    /// individuals keep their current relative order — the tie-break is
    /// reproducible for a fixed seed.  Unevaluated individuals rank last.
    pub fn sort_by_fitness(&mut self) {
        self.individuals.sort_by(|a, b| {
            let fa = a.fitness().unwrap_or(f64::NEG_INFINITY);
            let fb = b.fitness().unwrap_or(f64::NEG_INFINITY);
            fb.total_cmp(&fa)
        });
    }

    /// The current best individual (call after sorting).
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// `(max, mean, population std-dev)` over evaluated fitness values.
    /// `None` when nothing has been evaluated.
    pub fn fitness_stats(&self) -> Option<(f64, f64, f64)> {
        let values: Vec<f64> = self
            .individuals
            .iter()
            .filter_map(|i| i.fitness())
            .collect();
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        Some((max, mean, variance.sqrt()))
    }

    /// Replace `count` sampled individuals with mutated copies of
    /// themselves (sampling without replacement).
    pub fn mutate_sample(
        &mut self,
        count: usize,
        builder: &RouteBuilder<'_>,
        rng: &mut GaRng,
    ) -> GaResult<()> {
        let picked = rng.sample_indices(self.individuals.len(), count);
        for i in picked {
            self.individuals[i] = mutate(&self.individuals[i], builder, rng)?;
        }
        Ok(())
    }

    /// Elitist parent selection from a **sorted** population.
    ///
    /// Keeps the single best individual unconditionally, samples 90% of the
    /// remaining top half and 10% of the bottom half (both without
    /// replacement, sizes floored as fractions of `len/2`), and consumes
    /// the population: non-selected individuals are dropped.
    pub fn select(self, rng: &mut GaRng) -> Vec<Individual> {
        let n = self.individuals.len();
        if n == 0 {
            return Vec::new();
        }
        let half = n as f64 / 2.0;
        let cut = (half as usize).min(n).max(1);

        let mut top = self.individuals;
        let bottom = top.split_off(cut);
        let mut top = top.into_iter();
        // Sorted descending, so the first element is the elite.
        let best = match top.next() {
            Some(b) => b,
            None => return Vec::new(),
        };
        let top: Vec<Individual> = top.collect();

        let over_k = ((0.9 * half) as usize).saturating_sub(1);
        let under_k = (0.1 * half) as usize;

        let mut pool = Vec::with_capacity(1 + over_k + under_k);
        pool.push(best);
        pool.extend(take_sample(top, over_k, rng));
        pool.extend(take_sample(bottom, under_k, rng));
        pool
    }
}

/// Move `k` distinct random elements out of `source` (rank order kept).
fn take_sample(source: Vec<Individual>, k: usize, rng: &mut GaRng) -> Vec<Individual> {
    let picked = rng.sample_indices(source.len(), k);
    let mut mask = vec![false; source.len()];
    for i in picked {
        mask[i] = true;
    }
    source
        .into_iter()
        .zip(mask)
        .filter_map(|(ind, keep)| keep.then_some(ind))
        .collect()
}

// ── Crossover ─────────────────────────────────────────────────────────────────

/// Cross two parents into two children.
///
/// Each gene slot is assigned from one parent, the two children taking
/// complementary sides.  The first slot's parent is uniform; afterwards the
/// assignment switches parents with probability [`ANTI_STREAK_SWITCH`].
/// Children always receive fresh clones — no route storage is shared with
/// either parent.
pub fn crossover(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut GaRng,
) -> (Individual, Individual) {
    let genes1 = parent1.clone_genes();
    let genes2 = parent2.clone_genes();
    let count = genes1.len();

    let mut child1: Vec<Route> = Vec::with_capacity(count);
    let mut child2: Vec<Route> = Vec::with_capacity(count);

    let mut take_first = rng.gen_bool(0.5);
    for (slot, (g1, g2)) in genes1.into_iter().zip(genes2).enumerate() {
        if slot > 0 && rng.gen_bool(ANTI_STREAK_SWITCH) {
            take_first = !take_first;
        }
        if take_first {
            child1.push(g1);
            child2.push(g2);
        } else {
            child1.push(g2);
            child2.push(g1);
        }
    }

    (Individual::new("", child1), Individual::new("", child2))
}

// ── Mutation ──────────────────────────────────────────────────────────────────

/// Mutate an individual: each gene is kept with probability 1/2, otherwise
/// replaced with a freshly built route carrying the same positional label.
/// Returns a new, unevaluated individual.
pub fn mutate(
    individual: &Individual,
    builder: &RouteBuilder<'_>,
    rng: &mut GaRng,
) -> GaResult<Individual> {
    mutate_with(individual, builder, rng, |rng| rng.gen_bool(0.5))
}

/// Mutation with an injectable keep/replace decision, for tests that pin
/// the per-gene draw.
pub(crate) fn mutate_with(
    individual: &Individual,
    builder: &RouteBuilder<'_>,
    rng: &mut GaRng,
    mut keep: impl FnMut(&mut GaRng) -> bool,
) -> GaResult<Individual> {
    let mut genes: Vec<Route> = Vec::with_capacity(individual.gene_count());
    for (slot, gene) in individual.genes().iter().enumerate() {
        if keep(rng) {
            genes.push(gene.clone());
        } else {
            genes.push(builder.build((slot + 1).to_string(), rng)?);
        }
    }
    Ok(Individual::new(individual.label().to_string(), genes))
}

// ── Reproduction ──────────────────────────────────────────────────────────────

/// Build the next generation from a parent pool.
///
/// Disjoint parent pairs are drawn uniformly without replacement until the
/// pool is exhausted; every pair contributes two crossover children, and a
/// final unpaired parent contributes a mutation clone of itself.  Parents
/// carry over alongside their children.  If the result is still short of
/// `params.population_size` (odd pools, flooring losses in selection), the
/// difference is topped up with freshly generated individuals.
pub fn reproduce(
    pool: Vec<Individual>,
    builder: &RouteBuilder<'_>,
    params: &GaParams,
    rng: &mut GaRng,
) -> GaResult<Vec<Individual>> {
    let mut remaining = pool;
    let mut parents: Vec<Individual> = Vec::with_capacity(remaining.len());
    let mut children: Vec<Individual> = Vec::with_capacity(remaining.len() + 1);

    while remaining.len() > 1 {
        let first = remaining.swap_remove(rng.gen_range(0..remaining.len()));
        let second = remaining.swap_remove(rng.gen_range(0..remaining.len()));
        let (c1, c2) = crossover(&first, &second, rng);
        children.push(c1);
        children.push(c2);
        parents.push(first);
        parents.push(second);
    }
    if let Some(unpaired) = remaining.pop() {
        children.push(mutate(&unpaired, builder, rng)?);
        parents.push(unpaired);
    }

    let mut generation = parents;
    generation.append(&mut children);

    let mut serial = 0;
    while generation.len() < params.population_size {
        generation.push(Individual::generate(
            format!("n{serial}"),
            builder,
            params.num_routes,
            params.max_route_attempts,
            rng,
        )?);
        serial += 1;
    }

    Ok(generation)
}
