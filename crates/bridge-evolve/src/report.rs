use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use bridge_bot::Genome;
use bridge_core::game::deal::{Deal, DealRecord};
use bridge_core::game::state::{GameState, TrickRecord};
use bridge_core::model::contract::Verdict;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::evolution::{EvolutionOutcome, GenerationStats};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> ReportError {
    move |source| ReportError::Io { context, source }
}

/// Normal-approximation interval around the mean replicate score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    /// 95% interval; `None` with fewer than two scores.
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        let n = scores.len();
        if n < 2 {
            return None;
        }
        let n_f = n as f64;
        let mean = scores.iter().sum::<f64>() / n_f;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n_f - 1.0);
        let z = Normal::new(0.0, 1.0).ok()?.inverse_cdf(0.975);
        let half = z * (variance / n_f).sqrt();
        Some(Self {
            mean,
            low: mean - half,
            high: mean + half,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub seed: u64,
    pub contract: String,
    pub deal: DealRecord,
    pub tricks: Vec<TrickRecord>,
    pub declarer_tricks: u8,
    pub defense_tricks: u8,
    pub verdict: Verdict,
    pub made: bool,
    pub best_genome: Genome,
    pub best_fitness: Option<f64>,
    pub fitness_interval: Option<ConfidenceInterval>,
    pub generations_run: usize,
    pub early_stopped: bool,
    pub history: Vec<GenerationStats>,
}

impl RunReport {
    pub fn new(
        run_id: &str,
        seed: u64,
        deal: &Deal,
        replay: &GameState,
        outcome: &EvolutionOutcome,
    ) -> Self {
        let verdict = replay.verdict();
        Self {
            run_id: run_id.to_string(),
            seed,
            contract: deal.contract().to_string(),
            deal: deal.to_record(),
            tricks: replay.history().to_vec(),
            declarer_tricks: replay.declarer_tricks(),
            defense_tricks: replay.defense_tricks(),
            verdict,
            made: verdict.is_made(),
            best_genome: outcome.best.genome.clone(),
            best_fitness: outcome.best.fitness,
            fitness_interval: ConfidenceInterval::from_scores(&outcome.best.scores),
            generations_run: outcome.generations_run,
            early_stopped: outcome.early_stopped,
            history: outcome.history.clone(),
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        ensure_parent(path)?;
        let file = File::create(path).map_err(io("creating report file"))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n").map_err(io("writing report file"))?;
        writer.flush().map_err(io("flushing report file"))?;
        Ok(())
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        ensure_parent(path)?;
        fs::write(path, self.to_markdown()).map_err(io("writing summary markdown"))
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Declarer evolution: {}\n\n", self.run_id));
        out.push_str(&format!(
            "Contract {}, seed {}, {} generation(s){}\n\n",
            self.contract,
            self.seed,
            self.generations_run,
            if self.early_stopped {
                " (stopped early)"
            } else {
                ""
            }
        ));
        out.push_str(&format!(
            "Result: declarer {} tricks, defense {} tricks, {}\n\n",
            self.declarer_tricks, self.defense_tricks, self.verdict
        ));
        if let Some(fitness) = self.best_fitness {
            out.push_str(&format!("Best fitness: {fitness:.2}"));
            if let Some(ci) = self.fitness_interval {
                out.push_str(&format!(
                    " (replicate mean {:.2}, 95% CI {:.2} to {:.2})",
                    ci.mean, ci.low, ci.high
                ));
            }
            out.push_str("\n\n");
        }

        out.push_str("## Tricks\n\n| # | Leader | Plays | Winner |\n| --- | --- | --- | --- |\n");
        for trick in &self.tricks {
            let plays = trick
                .plays
                .iter()
                .map(|play| format!("{} {}", play.seat.letter(), play.card))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                trick.number, trick.leader, plays, trick.winner
            ));
        }

        out.push_str("\n## Generations\n\n| Generation | Best | Mean | Worst | Std dev |\n| --- | --- | --- | --- | --- |\n");
        for stats in &self.history {
            out.push_str(&format!(
                "| {} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
                stats.generation, stats.best, stats.mean, stats.worst, stats.std_dev
            ));
        }
        out
    }
}

/// Human-readable result of one finished play.
pub fn trick_summary(state: &GameState) -> String {
    let contract = state.contract();
    let declarer_side = contract.declarer.side();
    let mut declarer_won = Vec::new();
    let mut defense_won = Vec::new();
    for trick in state.history() {
        if contract.is_declarer_side(trick.winner) {
            declarer_won.push(trick.number.to_string());
        } else {
            defense_won.push(trick.number.to_string());
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "Contract: {contract}");
    let _ = writeln!(
        out,
        "Declarer side: {declarer_side}  Defense: {}",
        declarer_side.opponents()
    );
    let _ = writeln!(
        out,
        "Declarer won {} trick(s): {}",
        state.declarer_tricks(),
        list_or_dash(&declarer_won)
    );
    let _ = writeln!(
        out,
        "Defense won {} trick(s): {}",
        state.defense_tricks(),
        list_or_dash(&defense_won)
    );
    let _ = write!(out, "Result: {}", state.verdict());
    out
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn ensure_parent(path: &Path) -> Result<(), ReportError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io("creating report directory"))?;
    }
    Ok(())
}
