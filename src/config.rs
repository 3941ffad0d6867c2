//! Session configuration
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional TOML file, and command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::history;

/// Default number of trials per session
pub const DEFAULT_TRIALS: usize = 5;

/// Default lower bound of the pre-cue delay (seconds)
pub const DEFAULT_MIN_DELAY_SECS: f64 = 2.0;

/// Default upper bound of the pre-cue delay (seconds)
pub const DEFAULT_MAX_DELAY_SECS: f64 = 5.0;

/// Upper bound on trials per session
pub const MAX_TRIALS: usize = 1000;

/// Upper bound on either end of the delay window (seconds)
pub const MAX_DELAY_LIMIT_SECS: f64 = 3600.0;

/// Configuration for one test session
///
/// # Example
/// ```
/// use reaction_time::config::SessionConfig;
///
/// let config = SessionConfig::default();
/// assert_eq!(config.trials, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Number of measured trials (1 to `MAX_TRIALS`)
    pub trials: usize,

    /// Shortest wait before the go-cue, in seconds
    pub min_delay_secs: f64,

    /// Longest wait before the go-cue, in seconds
    pub max_delay_secs: f64,

    /// History log location. `None` means `~/reaction_time_log.csv`.
    pub log_file: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            min_delay_secs: DEFAULT_MIN_DELAY_SECS,
            max_delay_secs: DEFAULT_MAX_DELAY_SECS,
            log_file: None,
        }
    }
}

impl SessionConfig {
    /// Load settings from a TOML file; missing keys keep their defaults
    ///
    /// # Example TOML
    /// ```toml
    /// trials = 10
    /// min_delay_secs = 1.5
    /// max_delay_secs = 4.0
    /// log_file = "/tmp/reaction_log.csv"
    /// ```
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        toml::from_str(&content).with_context(|| {
            format!("Failed to parse TOML config: {}", path.as_ref().display())
        })
    }

    /// Apply command-line overrides on top of the current settings
    pub fn with_overrides(mut self, trials: Option<usize>, log_file: Option<PathBuf>) -> Self {
        if let Some(trials) = trials {
            self.trials = trials;
        }
        if let Some(log_file) = log_file {
            self.log_file = Some(log_file);
        }
        self
    }

    /// Resolve the history log path, falling back to the home directory
    pub fn resolve_log_path(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => Ok(history::default_log_path()?),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.trials < 1 {
            return Err(format!("trials must be >= 1, got {}", self.trials));
        }

        if self.trials > MAX_TRIALS {
            return Err(format!(
                "trials must be <= {}, got {}",
                MAX_TRIALS, self.trials
            ));
        }

        if !self.min_delay_secs.is_finite() || self.min_delay_secs < 0.0 {
            return Err(format!(
                "min_delay_secs must be a non-negative number, got {}",
                self.min_delay_secs
            ));
        }

        if !self.max_delay_secs.is_finite() || self.max_delay_secs < self.min_delay_secs {
            return Err(format!(
                "max_delay_secs must be >= min_delay_secs ({}), got {}",
                self.min_delay_secs, self.max_delay_secs
            ));
        }

        if self.max_delay_secs > MAX_DELAY_LIMIT_SECS {
            return Err(format!(
                "max_delay_secs must be <= {}, got {}",
                MAX_DELAY_LIMIT_SECS, self.max_delay_secs
            ));
        }

        Ok(())
    }
}
