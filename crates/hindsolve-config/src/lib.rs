//! Configuration for the hindsolve step machine.
//!
//! Loads the knobs spec §6 enumerates from TOML or YAML so they can be
//! tuned without code changes.
//!
//! # Examples
//!
//! ```
//! use hindsolve_config::SolverConfig;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     max_steps = 10000
//!     literal_default_early_exit = true
//!     disjunction_short_circuit = true
//! "#).unwrap();
//!
//! assert_eq!(config.max_steps, 10000);
//! ```
//!
//! ```
//! use hindsolve_config::SolverConfig;
//!
//! let config = SolverConfig::load("hindsolve.toml").unwrap_or_default();
//! // Proceeds with defaults if the file doesn't exist.
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn default_true() -> bool {
    true
}

fn default_max_steps() -> u64 {
    1_000_000
}

/// The driver's configuration knobs (spec §6).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Suppress inter-step filtering for diagnostics.
    #[serde(default)]
    pub retain_all_solutions: bool,

    /// Hard cap on driver iterations (steps popped from the work list).
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Wall-clock budget in milliseconds, measured from the start of
    /// `solve`. `None` means no deadline.
    #[serde(default)]
    pub deadline_millis: Option<u64>,

    /// Enable §4.4 step-2 literal-default pruning.
    #[serde(default = "default_true")]
    pub literal_default_early_exit: bool,

    /// Enable §4.5 step-2 `shouldShortCircuitAt` pruning.
    #[serde(default = "default_true")]
    pub disjunction_short_circuit: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            retain_all_solutions: false,
            max_steps: default_max_steps(),
            deadline_millis: None,
            literal_default_early_exit: true,
            disjunction_short_circuit: true,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file (the default format).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Returns the configured deadline as a `Duration`, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_millis.map(Duration::from_millis)
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_millis = Some(deadline.as_millis() as u64);
        self
    }

    pub fn with_retain_all_solutions(mut self, retain: bool) -> Self {
        self.retain_all_solutions = retain;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_both_pruning_flags() {
        let config = SolverConfig::default();
        assert!(config.literal_default_early_exit);
        assert!(config.disjunction_short_circuit);
        assert!(!config.retain_all_solutions);
        assert!(config.deadline().is_none());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config = SolverConfig::from_toml_str("max_steps = 5\n").unwrap();
        assert_eq!(config.max_steps, 5);
        assert!(config.literal_default_early_exit);
    }

    #[test]
    fn builder_methods_round_trip() {
        let config = SolverConfig::new()
            .with_max_steps(42)
            .with_deadline(Duration::from_millis(250))
            .with_retain_all_solutions(true);

        assert_eq!(config.max_steps, 42);
        assert_eq!(config.deadline(), Some(Duration::from_millis(250)));
        assert!(config.retain_all_solutions);
    }

    #[test]
    fn rejects_invalid_toml() {
        let err = SolverConfig::from_toml_str("max_steps = \"not a number\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
