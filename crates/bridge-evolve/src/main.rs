use std::path::PathBuf;

use clap::Parser;

use bridge_evolve::config::{EvolveConfig, ResolvedOutputs};
use bridge_evolve::logging::init_logging;
use bridge_evolve::runner::EvolveRunner;

/// Evolves declarer play for a single bridge deal.
#[derive(Debug, Parser)]
#[command(
    name = "bridge-evolve",
    author,
    version,
    about = "Genetic search over declarer card-play heuristics"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config/evolve.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the deal JSON file.
    #[arg(long, value_name = "FILE")]
    deal: Option<PathBuf>,

    /// Override the master RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the generation budget.
    #[arg(long, value_name = "COUNT")]
    generations: Option<usize>,

    /// Override the population size.
    #[arg(long, value_name = "COUNT")]
    population: Option<usize>,

    /// Exit after validating the configuration and deal (no search is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = EvolveConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(deal) = cli.deal {
        config.deal = deal;
    }

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    if let Some(generations) = cli.generations {
        config.search.generations = generations;
    }

    if let Some(population) = cli.population {
        config.search.population = population;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    println!(
        "Loaded configuration '{run_id}' ({} genomes x {} generations, seed {})",
        config.search.population,
        config.search.generations,
        config.seed()
    );

    let logging = config.logging.clone();
    let runner = EvolveRunner::new(config, outputs.clone())?;
    println!("{}", runner.deal());

    if cli.validate_only {
        println!("Validation-only mode: search skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&logging, &outputs)?;

    let summary = runner.run()?;
    println!(
        "Search complete for '{run_id}': {} generation(s){}",
        summary.generations_run,
        if summary.early_stopped {
            ", stopped early"
        } else {
            ""
        }
    );
    if let Some(fitness) = summary.best_fitness {
        println!("Best fitness: {fitness:.2}");
    }
    println!("{}", summary.trick_summary);
    println!("Report: {}", summary.report_path.display());
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
