//! Replicate scoring and the variance-damped fitness aggregate.

use bridge_bot::{DeclarerStrategy, DefensePolicy};
use bridge_core::game::deal::Deal;
use bridge_core::model::contract::Verdict;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::{EvolveError, Individual};
use crate::simulation::{SimulationOutcome, simulate};

const POINTS_PER_TRICK: f64 = 10.0;
const MADE_BONUS: f64 = 100.0;
const POINTS_PER_OVERTRICK: f64 = 20.0;
const POINTS_PER_UNDERTRICK: f64 = 10.0;
/// Spread (max - min) that halves the mean.
const SPREAD_SCALE: f64 = 10.0;

/// Score of one finished play, before jitter.
pub fn contract_score(declarer_tricks: u8, verdict: Verdict) -> f64 {
    let base = POINTS_PER_TRICK * f64::from(declarer_tricks);
    match verdict {
        Verdict::Made { overtricks } => {
            base + MADE_BONUS + POINTS_PER_OVERTRICK * f64::from(overtricks)
        }
        Verdict::Down { undertricks } => base - POINTS_PER_UNDERTRICK * f64::from(undertricks),
    }
}

pub fn replicate_score(outcome: &SimulationOutcome, noise: f64) -> f64 {
    contract_score(outcome.state.declarer_tricks(), outcome.verdict) + noise
}

/// Mean of the replicate scores, shrunk by their spread.
pub fn aggregate(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    mean / (1.0 + (max - min) / SPREAD_SCALE)
}

/// Plays replicates of one deal for every individual that still lacks a
/// fitness value.
pub struct Evaluator<'a> {
    deal: &'a Deal,
    defense: DefensePolicy,
    replicates: usize,
    jitter: f64,
    parallel: bool,
}

impl<'a> Evaluator<'a> {
    pub fn new(deal: &'a Deal, replicates: usize, jitter: f64, parallel: bool) -> Self {
        Self {
            deal,
            defense: DefensePolicy::new(),
            replicates: replicates.max(1),
            jitter,
            parallel,
        }
    }

    /// Seeds are drawn from `rng` in population order before any work is
    /// scheduled, so the result does not depend on the thread count.
    pub fn evaluate_pending(
        &self,
        population: &mut [Individual],
        rng: &mut StdRng,
    ) -> Result<usize, EvolveError> {
        let pending: Vec<usize> = population
            .iter()
            .enumerate()
            .filter(|(_, individual)| individual.fitness.is_none())
            .map(|(index, _)| index)
            .collect();
        if pending.is_empty() {
            return Ok(0);
        }

        let strategies: Vec<DeclarerStrategy> = pending
            .iter()
            .map(|&index| DeclarerStrategy::new(population[index].genome.clone()))
            .collect();
        let jobs: Vec<(usize, u64)> = (0..strategies.len())
            .flat_map(|slot| (0..self.replicates).map(move |_| slot))
            .map(|slot| (slot, rng.r#gen::<u64>()))
            .collect();

        let run = |&(slot, seed): &(usize, u64)| self.replicate(&strategies[slot], seed);
        let scores: Vec<f64> = if self.parallel {
            jobs.par_iter().map(run).collect::<Result<_, _>>()?
        } else {
            jobs.iter().map(run).collect::<Result<_, _>>()?
        };

        for (&index, chunk) in pending.iter().zip(scores.chunks(self.replicates)) {
            let individual = &mut population[index];
            individual.fitness = Some(aggregate(chunk));
            individual.scores = chunk.to_vec();
        }
        Ok(pending.len())
    }

    fn replicate(&self, strategy: &DeclarerStrategy, seed: u64) -> Result<f64, EvolveError> {
        let outcome = simulate(self.deal, strategy, &self.defense)?;
        let noise = if self.jitter > 0.0 {
            StdRng::seed_from_u64(seed).gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        Ok(replicate_score(&outcome, noise))
    }
}
