use std::path::PathBuf;

use bridge_bot::{DeclarerStrategy, DefensePolicy};
use bridge_core::game::deal::{Deal, DealError};
use bridge_core::game::state::GameState;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{EvolveConfig, ResolvedOutputs};
use crate::evolution::{EvolutionEngine, EvolutionOutcome, EvolveError};
use crate::report::{ReportError, RunReport, trick_summary};
use crate::simulation::{SimulationError, simulate};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to load deal {path:?}: {source}")]
    Deal {
        path: PathBuf,
        #[source]
        source: DealError,
    },
    #[error(transparent)]
    Evolve(#[from] EvolveError),
    #[error("replay of the best genome failed: {0}")]
    Replay(#[from] SimulationError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Results of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub generations_run: usize,
    pub early_stopped: bool,
    pub best_fitness: Option<f64>,
    pub replay: GameState,
    pub trick_summary: String,
    pub report_path: PathBuf,
    pub summary_path: PathBuf,
}

pub struct EvolveRunner {
    config: EvolveConfig,
    outputs: ResolvedOutputs,
    deal: Deal,
}

impl EvolveRunner {
    /// Loads and validates the deal named by the configuration.
    pub fn new(config: EvolveConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let deal = Deal::from_path(&config.deal).map_err(|source| RunnerError::Deal {
            path: config.deal.clone(),
            source,
        })?;
        Ok(Self {
            config,
            outputs,
            deal,
        })
    }

    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    pub fn run(self) -> Result<RunSummary, RunnerError> {
        let outcome = EvolutionEngine::new(&self.deal, &self.config).run()?;
        let replay = self.replay(&outcome)?;

        let report = RunReport::new(
            &self.config.run_id,
            self.config.seed(),
            &self.deal,
            &replay,
            &outcome,
        );
        report.write_json(&self.outputs.report_json)?;
        report.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            generations_run: outcome.generations_run,
            early_stopped: outcome.early_stopped,
            best_fitness: outcome.best.fitness,
            trick_summary: trick_summary(&replay),
            replay,
            report_path: self.outputs.report_json,
            summary_path: self.outputs.summary_md,
        })
    }

    /// Plays the deal once more with the winning genome.
    fn replay(&self, outcome: &EvolutionOutcome) -> Result<GameState, RunnerError> {
        let strategy = DeclarerStrategy::new(outcome.best.genome.clone());
        let played = simulate(&self.deal, &strategy, &DefensePolicy::new())?;
        if tracing::enabled!(target: "bridge_evolve::replay", Level::DEBUG) {
            for trick in played.state.history() {
                let plays = trick
                    .plays
                    .iter()
                    .map(|play| format!("{}:{}", play.seat.letter(), play.card))
                    .collect::<Vec<_>>()
                    .join(" ");
                event!(
                    target: "bridge_evolve::replay",
                    Level::DEBUG,
                    trick = trick.number,
                    leader = %trick.leader,
                    winner = %trick.winner,
                    plays = %plays,
                );
            }
        }
        event!(
            target: "bridge_evolve::replay",
            Level::INFO,
            declarer_tricks = played.state.declarer_tricks(),
            defense_tricks = played.state.defense_tricks(),
            verdict = %played.verdict,
        );
        Ok(played.state)
    }
}
