use std::fs::{self, File};
use std::path::PathBuf;

use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

pub const TELEMETRY_FILE: &str = "telemetry.jsonl";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("creating telemetry directory at {path:?}: {source}")]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("creating telemetry file at {path:?}: {source}")]
    CreateFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Keeps the non-blocking writer flushing until dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<LoggingGuard>, LoggingError> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let telemetry_dir = outputs.report_dir();
    fs::create_dir_all(&telemetry_dir).map_err(|source| LoggingError::CreateDir {
        source,
        path: telemetry_dir.clone(),
    })?;

    let telemetry_path = telemetry_dir.join(TELEMETRY_FILE);
    let file = File::create(&telemetry_path).map_err(|source| LoggingError::CreateFile {
        source,
        path: telemetry_path.clone(),
    })?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // A global subscriber may already be installed, e.g. by another test.
    let _ = tracing::subscriber::set_global_default(subscriber);

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}
