//! Advisor configuration.
//!
//! Loaded from JSON; every field has a default, so `{}` is a valid file.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration for the advisor.
///
/// # Example
/// ```
/// use hu_advisor::AdvisorConfig;
///
/// let config = AdvisorConfig::default().with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Directory holding the `<range name>.txt` files.
    pub ranges_dir: PathBuf,

    /// Size of the big blind in table currency. Preflop situations are
    /// classified in multiples of it.
    pub big_blind: f64,

    /// Monte Carlo iterations per equity estimate.
    pub equity_iterations: usize,

    /// Iterations per parallel simulation chunk.
    pub simulation_chunk: usize,

    /// Random seed for reproducibility.
    ///
    /// If set, range draws and simulations are reproducible. If `None`, the
    /// rng is seeded from entropy.
    pub seed: Option<u64>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            ranges_dir: PathBuf::from("ranges"),
            big_blind: 1.0,
            equity_iterations: 1_000,
            simulation_chunk: crate::equity::DEFAULT_CHUNK,
            seed: None,
        }
    }
}

impl AdvisorConfig {
    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.big_blind.is_finite() || self.big_blind <= 0.0 {
            return Err(ConfigError::InvalidBigBlind(self.big_blind));
        }
        if self.equity_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.simulation_chunk == 0 {
            return Err(ConfigError::ZeroChunk);
        }
        Ok(())
    }

    /// Builder method: set the ranges directory.
    pub fn with_ranges_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.ranges_dir = dir.into();
        self
    }

    /// Builder method: set the big blind size.
    pub fn with_big_blind(mut self, big_blind: f64) -> Self {
        self.big_blind = big_blind;
        self
    }

    /// Builder method: set the equity iterations.
    pub fn with_equity_iterations(mut self, iterations: usize) -> Self {
        self.equity_iterations = iterations;
        self
    }

    /// Builder method: set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Random source for one advisor session.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid big blind {0} (must be positive)")]
    InvalidBigBlind(f64),
    #[error("equity_iterations must be positive")]
    ZeroIterations,
    #[error("simulation_chunk must be positive")]
    ZeroChunk,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_parse_json_config() {
        let config = AdvisorConfig::from_json_str(
            r#"{"ranges_dir": "/opt/ranges", "big_blind": 0.2, "equity_iterations": 5000, "seed": 3}"#,
        )
        .unwrap();
        assert_eq!(config.ranges_dir, PathBuf::from("/opt/ranges"));
        assert_eq!(config.big_blind, 0.2);
        assert_eq!(config.equity_iterations, 5000);
        assert_eq!(config.simulation_chunk, crate::equity::DEFAULT_CHUNK);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(AdvisorConfig::from_json_str("{}").unwrap(), AdvisorConfig::default());
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            AdvisorConfig::default().with_big_blind(0.0).validate(),
            Err(ConfigError::InvalidBigBlind(_))
        ));
        assert!(matches!(
            AdvisorConfig::default().with_equity_iterations(0).validate(),
            Err(ConfigError::ZeroIterations)
        ));
        assert!(matches!(
            AdvisorConfig::from_json_str(r#"{"simulation_chunk": 0}"#),
            Err(ConfigError::ZeroChunk)
        ));
        assert!(matches!(AdvisorConfig::from_json_str("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            AdvisorConfig::from_json_file("/nonexistent/advisor.json"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = AdvisorConfig::default().with_seed(99);
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
