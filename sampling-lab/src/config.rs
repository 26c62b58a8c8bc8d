//! Configuration loading for sampling-lab.
//!
//! Supports loading configuration from TOML files, with defaults that
//! reproduce the classic lecture experiments for every setting.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for sampling-lab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the runner data comes from.
    pub data: DataConfig,
    /// Random source settings.
    pub sampling: SamplingConfig,
    /// Population and single-sample histograms.
    pub histograms: HistogramConfig,
    /// Tight versus wide Gaussian sample means.
    pub spread: SpreadConfig,
    /// Continuous dice for the Central Limit Theorem.
    pub dice: DiceConfig,
    /// Estimated mean versus sample size.
    pub sweep: SweepConfig,
    /// Sample SD versus population SD.
    pub std_dev: StdDevConfig,
    /// Confidence-interval coverage.
    pub interval: IntervalConfig,
}

/// Configuration for the input data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the comma-separated results file.
    pub path: PathBuf,
    /// Drop unparseable rows with a warning instead of failing.
    pub skip_malformed: bool,
}

/// Configuration for the random source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Seed for the generator; drawn from the OS when unset.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub population_bins: usize,
    pub sample_size: usize,
    pub sample_bins: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    pub trials: usize,
    pub sample_size: usize,
    pub tight_sd: f64,
    pub wide_sd: f64,
    /// Half-width of the interval around the true mean whose probability is reported.
    pub bound: f64,
    pub bins: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceConfig {
    /// Dice values are uniform on `[0, scale)`.
    pub scale: f64,
    pub dice_thrown: usize,
    /// One histogram per entry, averaging this many dice per trial.
    pub dice_per_trial: Vec<usize>,
    pub bins: usize,
}

/// Sample sizes `start, start + step, ...` below `end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start: usize,
    pub end: usize,
    pub step: usize,
    /// Trials averaged at each sample size.
    pub sub_trials: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StdDevConfig {
    pub start: usize,
    pub end: usize,
    pub step: usize,
    pub trials: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalConfig {
    /// Critical value multiplying the standard error.
    pub z_critical: f64,
    pub sample_size: usize,
    pub trials: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bm_results2012.txt"),
            skip_malformed: false,
        }
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            population_bins: 20,
            sample_size: 40,
            sample_bins: 10,
        }
    }
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            sample_size: 40,
            tight_sd: 1.0,
            wide_sd: 100.0,
            bound: 3.0,
            bins: 20,
        }
    }
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            scale: 5.0,
            dice_thrown: 100_000,
            dice_per_trial: vec![1, 100],
            bins: 11,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: 50,
            end: 2000,
            step: 200,
            sub_trials: 20,
        }
    }
}

impl Default for StdDevConfig {
    fn default() -> Self {
        Self {
            start: 2,
            end: 200,
            step: 2,
            trials: 100,
        }
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            z_critical: sampling_lab_core::DEFAULT_Z,
            sample_size: 200,
            trials: 10_000,
        }
    }
}

/// `start, start + step, ...` strictly below `end`. Empty when `step` is zero.
pub fn size_range(start: usize, end: usize, step: usize) -> Vec<usize> {
    if step == 0 {
        return Vec::new();
    }
    (start..end).step_by(step).collect()
}

impl SweepConfig {
    pub fn sample_sizes(&self) -> Vec<usize> {
        size_range(self.start, self.end, self.step)
    }
}

impl StdDevConfig {
    pub fn sample_sizes(&self) -> Vec<usize> {
        size_range(self.start, self.end, self.step)
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".sampling-lab.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `path` if it exists, or use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }
}
