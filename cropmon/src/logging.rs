/// Structured logging for the crop-yield classification service
///
/// Wraps `tracing` so every event carries the pipeline component and, where
/// relevant, the observation location. Console output goes to stderr; an
/// optional log file receives the same events in append mode.

use std::fmt;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::model::ObservationError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Classifier,
    Aggregator,
    Correlation,
    Config,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Classifier => write!(f, "CLASSIFY"),
            Component::Aggregator => write!(f, "AGGREGATE"),
            Component::Correlation => write!(f, "CORRELATE"),
            Component::Config => write!(f, "CONFIG"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Initialization
// ---------------------------------------------------------------------------

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("A global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence over `min_level` when set. An existing
/// subscriber is kept and reported as `AlreadyInstalled`.
pub fn init_logger(
    min_level: LogLevel,
    log_file: Option<&str>,
    console_timestamps: bool,
) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(min_level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::LogFile {
                    path: PathBuf::from(path),
                    source,
                })?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None if console_timestamps => builder.with_writer(std::io::stderr).try_init(),
        None => builder
            .without_time()
            .with_writer(std::io::stderr)
            .try_init(),
    };

    installed.map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(component: Component, location: Option<&str>, message: &str) {
    tracing::info!(component = %component, location = location.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(component: Component, location: Option<&str>, message: &str) {
    tracing::warn!(component = %component, location = location.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(component: Component, location: Option<&str>, message: &str) {
    tracing::error!(component = %component, location = location.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(component: Component, location: Option<&str>, message: &str) {
    tracing::debug!(component = %component, location = location.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Structured Pipeline Logging
// ---------------------------------------------------------------------------

/// Log an observation excluded from classification
pub fn log_skipped_observation(index: usize, err: &ObservationError) {
    let message = format!("observation #{} skipped: {}", index, err);
    warn(Component::Classifier, Some(err.location()), &message);
}

/// Log a summary of one pipeline pass
///
/// All rows processed → info, none processed → error, otherwise warn.
pub fn log_run_summary(component: Component, total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Run complete: {}/{} processed, {} skipped",
        successful,
        total,
        failed
    );

    if failed == 0 {
        info(component, None, &message);
    } else if successful == 0 {
        error(component, None, &message);
    } else {
        warn(component, None, &message);
    }
}
