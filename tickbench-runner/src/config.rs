//! Benchmark configuration, loaded from TOML.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tickbench_core::strategy::StrategySpec;

use crate::harness::{default_strategies, HarnessOptions, NamedStrategy};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

/// Full benchmark configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub bench: BenchSettings,
    #[serde(default = "default_strategies")]
    pub strategies: Vec<NamedStrategy>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where ticks come from.
///
/// `synthetic_ticks`, when set, replaces the CSV with a seeded random walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub csv_path: Option<PathBuf>,
    pub symbol: Option<String>,
    pub synthetic_ticks: Option<usize>,
    pub synthetic_symbols: Vec<String>,
    pub seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: Some(PathBuf::from("btc_eth_market_data.csv")),
            symbol: None,
            synthetic_ticks: None,
            synthetic_symbols: vec!["BTC".into(), "ETH".into()],
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchSettings {
    pub sizes: Vec<usize>,
    pub profile_calls: bool,
    pub measure_memory: bool,
    pub sample_interval_ms: u64,
    pub profile_top_k: usize,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            sizes: vec![1_000, 10_000, 100_000],
            profile_calls: true,
            measure_memory: true,
            sample_interval_ms: 50,
            profile_top_k: 15,
        }
    }
}

impl BenchSettings {
    pub fn harness_options(&self) -> HarnessOptions {
        HarnessOptions {
            profile_calls: self.profile_calls,
            measure_memory: self.measure_memory,
            sample_interval: Duration::from_millis(self.sample_interval_ms),
            profile_top_k: self.profile_top_k,
            ..HarnessOptions::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for results, charts and the report.
    pub dir: PathBuf,
    /// Report file name inside `dir`.
    pub report: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            report: "complexity_report.md".into(),
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            bench: BenchSettings::default(),
            strategies: default_strategies(),
            output: OutputConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bench.sizes.is_empty() {
            return Err(ConfigError::Validation("bench.sizes is empty".into()));
        }
        if self.bench.sizes.contains(&0) {
            return Err(ConfigError::Validation(
                "bench.sizes must all be positive".into(),
            ));
        }
        if self.bench.measure_memory && self.bench.sample_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "bench.sample_interval_ms must be positive".into(),
            ));
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::Validation("no strategies configured".into()));
        }

        let mut seen = HashSet::new();
        for strategy in &self.strategies {
            if !seen.insert(strategy.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate strategy name '{}'",
                    strategy.name
                )));
            }
            strategy.spec.validate().map_err(|e| {
                ConfigError::Validation(format!("strategy '{}': {e}", strategy.name))
            })?;
        }

        if self.data.csv_path.is_none() && self.data.synthetic_ticks.is_none() {
            return Err(ConfigError::Validation(
                "data needs either csv_path or synthetic_ticks".into(),
            ));
        }
        if self.data.synthetic_ticks.is_some() && self.data.synthetic_symbols.is_empty() {
            return Err(ConfigError::Validation(
                "data.synthetic_symbols is empty".into(),
            ));
        }
        Ok(())
    }

    /// Adds a strategy under its default label unless the name is taken.
    pub fn push_strategy(&mut self, spec: StrategySpec) {
        let named = NamedStrategy::labelled(spec);
        if self.strategies.iter().all(|s| s.name != named.name) {
            self.strategies.push(named);
        }
    }
}
