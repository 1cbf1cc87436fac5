use bridge_bot::MutationParams;
use bridge_bot::genome::{DEFAULT_GENOME_LEN, MIN_GENOME_LEN};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root run configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EvolveConfig {
    pub run_id: String,
    /// Path to the deal JSON.
    pub deal: PathBuf,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub mutation: MutationConfig,
    #[serde(default)]
    pub convergence: ConvergenceConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EvolveConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: EvolveConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        if self.deal.as_os_str().is_empty() {
            return Err(invalid("deal", "deal path must not be empty"));
        }
        self.search.validate()?;
        self.mutation.validate()?;
        self.convergence.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        self.logging.validate()?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            report_json: resolve_template(&self.run_id, &self.outputs.report_json),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(0)
    }
}

/// Population and evaluation settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub population: usize,
    pub generations: usize,
    pub replicates: usize,
    pub genome_len: usize,
    pub elite_fraction: f64,
    pub tournament_size: usize,
    pub crossover_points: usize,
    /// Half-width of the uniform noise added to every replicate score.
    pub jitter: f64,
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population: 40,
            generations: 70,
            replicates: 4,
            genome_len: DEFAULT_GENOME_LEN,
            elite_fraction: 0.2,
            tournament_size: 5,
            crossover_points: 2,
            jitter: 5.0,
            parallel: true,
        }
    }
}

impl SearchConfig {
    /// Individuals carried over unchanged; never zero.
    pub fn elite_count(&self) -> usize {
        ((self.population as f64 * self.elite_fraction).floor() as usize)
            .clamp(1, self.population.max(1))
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.population < 2 {
            return Err(invalid("search.population", "population must be at least 2"));
        }
        if self.generations == 0 {
            return Err(invalid(
                "search.generations",
                "generation budget must be greater than zero",
            ));
        }
        if self.replicates == 0 {
            return Err(invalid("search.replicates", "replicates must be at least 1"));
        }
        if self.genome_len < MIN_GENOME_LEN {
            return Err(invalid(
                "search.genome_len",
                format!("genome length must be at least {MIN_GENOME_LEN}"),
            ));
        }
        if !(self.elite_fraction > 0.0 && self.elite_fraction < 1.0) {
            return Err(invalid(
                "search.elite_fraction",
                "elite fraction must lie strictly between 0 and 1",
            ));
        }
        if self.tournament_size == 0 {
            return Err(invalid(
                "search.tournament_size",
                "tournament size must be at least 1",
            ));
        }
        if self.crossover_points == 0 || self.crossover_points >= self.genome_len {
            return Err(invalid(
                "search.crossover_points",
                "crossover needs between 1 and genome_len - 1 cut points",
            ));
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(invalid("search.jitter", "jitter must be a non-negative number"));
        }
        Ok(())
    }
}

/// Mutation schedule: `initial_rate` until `decay_at` of the generation
/// budget has elapsed, `late_rate` afterwards.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MutationConfig {
    pub initial_rate: f64,
    pub late_rate: f64,
    pub decay_at: f64,
    pub large_jump: f64,
    pub impulse: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        let params = MutationParams::default();
        Self {
            initial_rate: 0.1,
            late_rate: 0.05,
            decay_at: 0.5,
            large_jump: params.large_jump,
            impulse: params.impulse,
        }
    }
}

impl MutationConfig {
    pub fn params(&self) -> MutationParams {
        MutationParams {
            large_jump: self.large_jump,
            impulse: self.impulse,
        }
    }

    /// Per-gene mutation rate for children bred after `generation`.
    pub fn rate_for(&self, generation: usize, budget: usize) -> f64 {
        let switch = (self.decay_at * budget as f64).floor() as usize;
        if generation < switch {
            self.initial_rate
        } else {
            self.late_rate
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("mutation.initial_rate", self.initial_rate),
            ("mutation.late_rate", self.late_rate),
            ("mutation.decay_at", self.decay_at),
            ("mutation.large_jump", self.large_jump),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "value must lie in [0, 1]"));
            }
        }
        if !(0.0..=2.0).contains(&self.impulse) {
            return Err(invalid("mutation.impulse", "impulse must lie in [0, 2]"));
        }
        Ok(())
    }
}

/// Early stopping: past `min_generations`, stop once the best fitness has
/// improved by less than `threshold` over the last `window` generations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ConvergenceConfig {
    pub enabled: bool,
    pub min_generations: usize,
    pub window: usize,
    pub threshold: f64,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_generations: 50,
            window: 25,
            threshold: 5.0,
        }
    }
}

impl ConvergenceConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.window < 2 {
            return Err(invalid(
                "convergence.window",
                "window must cover at least two generations",
            ));
        }
        if !self.threshold.is_finite() {
            return Err(invalid("convergence.threshold", "threshold must be finite"));
        }
        Ok(())
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub report_json: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.report_json", &self.report_json),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(label, "path must not be empty"));
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(invalid(label, "resolved path is invalid"));
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    /// Generation progress is logged every `log_every` generations.
    #[serde(default = "default_log_every")]
    pub log_every: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            log_every: default_log_every(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.level().is_none() {
            return Err(invalid(
                "logging.tracing_level",
                format!("unknown tracing level '{}'", self.tracing_level),
            ));
        }
        if self.log_every == 0 {
            return Err(invalid("logging.log_every", "log_every must be at least 1"));
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_every() -> usize {
    25
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(invalid(
            "run_id",
            "run_id may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }

    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub report_json: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory holding the summary; telemetry is written next to it.
    pub fn report_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
