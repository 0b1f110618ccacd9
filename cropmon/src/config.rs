//! Configuration file handling.
//!
//! Loads the band table and logging settings from a TOML file. Every
//! section is optional; an empty file yields the calibrated default bands.
//!
//! ```toml
//! [logging]
//! level = "info"
//! file = "cropmon.log"
//!
//! [bands.temperature_c]
//! good = { min = 18.0, max = 28.0 }
//! moderate_low = { min = 12.0, max = 18.0, max_inclusive = false }
//! moderate_high = { min = 28.0, max = 34.0, min_inclusive = false }
//! ```
//!
//! A variable's table is replaced as a whole; the other variables keep
//! their defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bands::{BandError, YieldBands};
use crate::logging::{self, Component, LogLevel, LoggingError};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "CROPMON_CONFIG";

/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_VAR: &str = "CROPMON_LOG";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropmonConfig {
    /// Classification band table.
    #[serde(default)]
    pub bands: YieldBands,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: LogLevel,

    /// Append log events to this file instead of stderr.
    #[serde(default)]
    pub file: Option<String>,

    /// Include timestamps in console output.
    #[serde(default)]
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            timestamps: false,
        }
    }
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid band table: {0}")]
    Bands(#[from] BandError),
    #[error("Invalid {var} value: {value}")]
    InvalidEnv { var: &'static str, value: String },
}

impl CropmonConfig {
    /// Parse configuration from TOML text and validate the band table.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: CropmonConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.bands.validate()?;
        Ok(config)
    }

    /// Resolve configuration from the process environment.
    ///
    /// Reads `.env` if present, then `CROPMON_CONFIG` (file path) and
    /// `CROPMON_LOG` (level override). Without `CROPMON_CONFIG` the
    /// defaults are used.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => load_config(path)?,
            None => CropmonConfig::default(),
        };

        if let Some(value) = lookup(LOG_LEVEL_VAR) {
            config.logging.level = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: LOG_LEVEL_VAR,
                value,
            })?;
        }

        Ok(config)
    }

    /// Install the global subscriber described by `logging`.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        logging::init_logger(
            self.logging.level,
            self.logging.file.as_deref(),
            self.logging.timestamps,
        )
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<CropmonConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = CropmonConfig::from_toml_str(&content, path)?;
    logging::info(
        Component::Config,
        None,
        &format!("Loaded configuration from {}", path.display()),
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::{Band, DEFAULT_BANDS};
    use std::collections::HashMap;
    use std::io::Write;

    fn parse(content: &str) -> Result<CropmonConfig, ConfigError> {
        CropmonConfig::from_toml_str(content, Path::new("test.toml"))
    }

    #[test]
    fn test_empty_config_uses_default_bands() {
        let config = parse("").unwrap();
        assert_eq!(config.bands, DEFAULT_BANDS);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_override_single_band() {
        let config = parse(
            r#"
            [bands.temperature_c.good]
            min = 18.0
            max = 28.0

            [bands.temperature_c.moderate_low]
            min = 12.0
            max = 18.0
            max_inclusive = false

            [bands.temperature_c.moderate_high]
            min = 28.0
            max = 34.0
            min_inclusive = false
            "#,
        )
        .unwrap();

        assert_eq!(config.bands.temperature_c.good, Band::closed(18.0, 28.0));
        assert_eq!(config.bands.temperature_c.moderate_low, Band::closed_open(12.0, 18.0));
        assert_eq!(config.bands.humidity_pct, DEFAULT_BANDS.humidity_pct);
    }

    #[test]
    fn test_logging_section() {
        let config = parse(
            r#"
            [logging]
            level = "warn"
            file = "cropmon.log"
            timestamps = true
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, LogLevel::Warning);
        assert_eq!(config.logging.file.as_deref(), Some("cropmon.log"));
        assert!(config.logging.timestamps);
    }

    #[test]
    fn test_inverted_band_fails_validation() {
        let result = parse(
            r#"
            [bands.humidity_pct.good]
            min = 80.0
            max = 50.0
            [bands.humidity_pct.moderate_low]
            min = 40.0
            max = 50.0
            [bands.humidity_pct.moderate_high]
            min = 75.0
            max = 85.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Bands(BandError::Inverted { .. }))));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        assert!(matches!(parse("[bands"), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_env_lookup_reads_path_and_level() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"error\"").unwrap();

        let vars: HashMap<&str, String> = HashMap::from([
            (CONFIG_PATH_VAR, file.path().display().to_string()),
            (LOG_LEVEL_VAR, "debug".to_string()),
        ]);
        let config = CropmonConfig::from_vars(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_init_logging_passes_file_error_on() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CropmonConfig::default();
        let path = dir.path().join("no-such-dir").join("cropmon.log");
        config.logging.file = Some(path.display().to_string());

        assert!(matches!(config.init_logging(), Err(LoggingError::LogFile { .. })));
    }

    #[test]
    fn test_env_lookup_without_vars_uses_defaults() {
        let config = CropmonConfig::from_vars(|_| None).unwrap();
        assert_eq!(config, CropmonConfig::default());
    }

    #[test]
    fn test_invalid_env_level_is_rejected() {
        let result = CropmonConfig::from_vars(|name| {
            (name == LOG_LEVEL_VAR).then(|| "loud".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidEnv { var: LOG_LEVEL_VAR, .. })));
    }
}
