//! The generation loop.
//!
//! `Evolution` owns the population, the generation counter, and the
//! statistics history; each [`step`](Evolution::step) runs one transition:
//! evaluate → record stats (even generations) → sort → select → reproduce →
//! mutate a sampled fraction.  Observer hooks fire at the recording points;
//! observation never feeds back into the optimization.

use tn_core::{FitnessParams, GaParams, GaRng};
use tn_network::{DemandMatrix, ShortestPaths, StopGraph};

use crate::builder::RouteBuilder;
use crate::fitness::FitnessEvaluator;
use crate::population::{reproduce, Population};
use crate::GaResult;

// ── GenerationStats ───────────────────────────────────────────────────────────

/// Population fitness summary for one recorded generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub iteration: u32,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Evolution::run`] at key points of the loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait EvolutionObserver {
    /// Called when a statistics record is taken (every even generation).
    fn on_stats(&mut self, _stats: &GenerationStats) {}

    /// Called after each completed generation transition.
    fn on_generation_end(&mut self, _generation: u32, _population: &Population) {}

    /// Called once after the final generation, with fitness evaluated and
    /// the population sorted best-first.
    fn on_run_end(&mut self, _final_generation: u32, _population: &Population) {}
}

/// An [`EvolutionObserver`] that does nothing.
pub struct NoopObserver;

impl EvolutionObserver for NoopObserver {}

// ── Evolution ─────────────────────────────────────────────────────────────────

/// Drives a population through the configured number of generations.
pub struct Evolution<'a> {
    params: &'a GaParams,
    builder: RouteBuilder<'a>,
    evaluator: FitnessEvaluator<'a>,
    population: Population,
    generation: u32,
    history: Vec<GenerationStats>,
    rng: GaRng,
}

impl<'a> Evolution<'a> {
    /// Validate all parameters, seed the run's RNG, and generate the
    /// initial population.
    pub fn new(
        graph: &'a StopGraph,
        demand: &'a DemandMatrix,
        shortest: &'a ShortestPaths,
        params: &'a GaParams,
        fitness: &'a FitnessParams,
    ) -> GaResult<Self> {
        params.validate()?;
        fitness.validate()?;

        let mut rng = GaRng::new(params.seed);
        let builder = RouteBuilder::new(graph, params)?;
        let evaluator = FitnessEvaluator::new(graph, demand, shortest, fitness);
        let population = Population::generate(&builder, params, &mut rng)?;

        Ok(Evolution {
            params,
            builder,
            evaluator,
            population,
            generation: 0,
            history: Vec::new(),
            rng,
        })
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The recorded statistics, one entry per even generation.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Run `params.generations` transitions, then evaluate and sort the
    /// final population so consumers see a ranked result.
    pub fn run<O: EvolutionObserver>(&mut self, observer: &mut O) -> GaResult<()> {
        for _ in 0..self.params.generations {
            self.step(observer)?;
        }
        self.population.evaluate(&self.evaluator);
        self.population.sort_by_fitness();
        observer.on_run_end(self.generation, &self.population);
        Ok(())
    }

    /// One generation transition.
    pub fn step<O: EvolutionObserver>(&mut self, observer: &mut O) -> GaResult<()> {
        self.population.evaluate(&self.evaluator);

        if self.generation % 2 == 0 {
            if let Some((max, mean, std_dev)) = self.population.fitness_stats() {
                let stats = GenerationStats { iteration: self.generation, max, mean, std_dev };
                observer.on_stats(&stats);
                self.history.push(stats);
            }
        }

        self.population.sort_by_fitness();

        let sorted = std::mem::replace(&mut self.population, Population::from_individuals(Vec::new()));
        let pool = sorted.select(&mut self.rng);
        let next = reproduce(pool, &self.builder, self.params, &mut self.rng)?;
        self.population = Population::from_individuals(next);

        let mutation_count =
            (self.population.len() as f64 * self.params.mutation_rate) as usize;
        self.population
            .mutate_sample(mutation_count, &self.builder, &mut self.rng)?;

        observer.on_generation_end(self.generation, &self.population);
        self.generation += 1;
        Ok(())
    }
}
