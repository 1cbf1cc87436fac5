//! Generational search over declarer genomes.

pub mod convergence;
pub mod fitness;
pub mod selection;

use bridge_bot::{Genome, GenomeError};
use bridge_core::game::deal::Deal;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::EvolveConfig;
use crate::simulation::SimulationError;
use fitness::Evaluator;

#[derive(Debug, Error)]
pub enum EvolveError {
    #[error("genome error: {0}")]
    Genome(#[from] GenomeError),
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
    #[error("population is empty")]
    EmptyPopulation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub genome: Genome,
    pub fitness: Option<f64>,
    /// Replicate scores behind `fitness`, jitter included.
    #[serde(default)]
    pub scores: Vec<f64>,
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: None,
            scores: Vec::new(),
        }
    }

    pub fn fitness_or_min(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best: f64,
    pub mean: f64,
    pub worst: f64,
    pub std_dev: f64,
}

impl GenerationStats {
    fn from_ranked(generation: usize, ranked: &[Individual]) -> Self {
        let values: Vec<f64> = ranked.iter().filter_map(|i| i.fitness).collect();
        let std_dev = if values.len() > 1 {
            values.iter().std_dev()
        } else {
            0.0
        };
        Self {
            generation,
            best: Statistics::max(values.iter()),
            mean: values.iter().mean(),
            worst: Statistics::min(values.iter()),
            std_dev,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub best: Individual,
    pub generations_run: usize,
    pub early_stopped: bool,
    pub history: Vec<GenerationStats>,
}

pub struct EvolutionEngine<'a> {
    deal: &'a Deal,
    config: &'a EvolveConfig,
    rng: StdRng,
}

impl<'a> EvolutionEngine<'a> {
    pub fn new(deal: &'a Deal, config: &'a EvolveConfig) -> Self {
        Self {
            deal,
            config,
            rng: StdRng::seed_from_u64(config.seed()),
        }
    }

    pub fn run(mut self) -> Result<EvolutionOutcome, EvolveError> {
        let config = self.config;
        let search = &config.search;
        let evaluator = Evaluator::new(self.deal, search.replicates, search.jitter, search.parallel);
        let mut population = self.initial_population()?;
        let mut history: Vec<GenerationStats> = Vec::with_capacity(search.generations);
        let mut best_history: Vec<f64> = Vec::with_capacity(search.generations);
        let mut early_stopped = false;

        for generation in 0..search.generations {
            evaluator.evaluate_pending(&mut population, &mut self.rng)?;
            selection::sort_descending(&mut population);

            let stats = GenerationStats::from_ranked(generation, &population);
            best_history.push(stats.best);
            let last = generation + 1 == search.generations;
            self.log_generation(&stats, last);
            history.push(stats);

            if convergence::has_converged(&best_history, &config.convergence) {
                early_stopped = true;
                event!(
                    target: "bridge_evolve::generation",
                    Level::INFO,
                    generation,
                    best = best_history.last().copied().unwrap_or_default(),
                    "early stop: best fitness stalled"
                );
                break;
            }
            if last {
                break;
            }
            population = self.next_generation(&population, generation)?;
        }

        let best = population
            .into_iter()
            .next()
            .ok_or(EvolveError::EmptyPopulation)?;
        Ok(EvolutionOutcome {
            best,
            generations_run: history.len(),
            early_stopped,
            history,
        })
    }

    fn initial_population(&mut self) -> Result<Vec<Individual>, EvolveError> {
        let search = &self.config.search;
        let rng = &mut self.rng;
        (0..search.population)
            .map(|_| {
                Genome::random(search.genome_len, rng)
                    .map(Individual::new)
                    .map_err(EvolveError::from)
            })
            .collect()
    }

    /// Elites carry over with their fitness; the rest are bred from
    /// tournament winners and left unevaluated.
    fn next_generation(
        &mut self,
        ranked: &[Individual],
        generation: usize,
    ) -> Result<Vec<Individual>, EvolveError> {
        let config = self.config;
        let search = &config.search;
        let mutation = &config.mutation;
        let rate = mutation.rate_for(generation, search.generations);
        let params = mutation.params();

        let mut next: Vec<Individual> = ranked.iter().take(search.elite_count()).cloned().collect();
        while next.len() < search.population {
            let mother = selection::tournament(ranked, search.tournament_size, &mut self.rng)
                .ok_or(EvolveError::EmptyPopulation)?;
            let father = selection::tournament(ranked, search.tournament_size, &mut self.rng)
                .ok_or(EvolveError::EmptyPopulation)?;
            let mut child =
                mother
                    .genome
                    .crossover(&father.genome, search.crossover_points, &mut self.rng)?;
            child.mutate(rate, &params, &mut self.rng);
            next.push(Individual::new(child));
        }
        Ok(next)
    }

    fn log_generation(&self, stats: &GenerationStats, last: bool) {
        let every = self.config.logging.log_every.max(1);
        if !last && stats.generation % every != 0 {
            return;
        }
        event!(
            target: "bridge_evolve::generation",
            Level::INFO,
            generation = stats.generation,
            best = stats.best,
            mean = stats.mean,
            worst = stats.worst,
            std_dev = stats.std_dev,
        );
    }
}
