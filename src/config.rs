//! Configuration management and validation.
//!
//! Provides the builder options that change how a flat file is read, the
//! processing options used by the CLI, and layered loading: defaults, then
//! an optional TOML file, then command-line overrides.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_FILE_PATTERN, DEFAULT_LOG_LEVEL,
    DEFAULT_PARALLEL_WORKERS, LOG_LEVELS, MAX_PARALLEL_WORKERS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options that affect how a single flat file is read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatfileConfig {
    /// Treat the first blank line as the end of the input instead of
    /// skipping it
    pub stop_at_blank_line: bool,

    /// Skip state-specific segment levels (`8`, `9`) instead of reporting
    /// them as invalid
    pub state_specific_segments: bool,

    /// Log every structural error at warn level instead of debug
    pub log_each_error: bool,
}

impl Default for FlatfileConfig {
    fn default() -> Self {
        Self {
            stop_at_blank_line: false,
            state_specific_segments: false,
            log_each_error: false,
        }
    }
}

impl FlatfileConfig {
    pub fn with_stop_at_blank_line(mut self, enabled: bool) -> Self {
        self.stop_at_blank_line = enabled;
        self
    }

    pub fn with_state_specific_segments(mut self, enabled: bool) -> Self {
        self.state_specific_segments = enabled;
        self
    }

    pub fn with_log_each_error(mut self, enabled: bool) -> Self {
        self.log_each_error = enabled;
        self
    }
}

/// Options for processing many files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of files built concurrently; defaults to the CPU count, capped
    /// at [`DEFAULT_PARALLEL_WORKERS`]
    pub workers: usize,

    /// Glob pattern applied to file names when a directory is given
    pub file_pattern: String,

    /// Exit with a failure status when any structural error was found
    pub fail_on_errors: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().clamp(1, DEFAULT_PARALLEL_WORKERS),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            fail_on_errors: false,
        }
    }
}

/// Logging options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level for the crate's own events
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub builder: FlatfileConfig,
    pub processing: ProcessingConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Default location of the configuration file
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine the configuration directory"))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::config_parse("<inline>", source))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file '{}'", path.display()),
                e,
            )
        })?;
        toml::from_str(&content)
            .map_err(|source| Error::config_parse(path.display().to_string(), source))
    }

    /// Load defaults, then the given file if any
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::load_from_file(path)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.processing.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if self.processing.workers > MAX_PARALLEL_WORKERS {
            return Err(Error::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_PARALLEL_WORKERS
            )));
        }

        glob::Pattern::new(&self.processing.file_pattern)
            .map_err(|source| Error::invalid_pattern(&self.processing.file_pattern, source))?;

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::configuration(format!(
                "Unknown log level '{}'. Expected one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
