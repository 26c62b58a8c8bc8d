//! Command-line interface for sampling-lab.

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use clap::{Parser, ValueEnum};
use sampling_lab_core::stats::{z_critical, StatsError};
use std::path::PathBuf;

/// The experiments the lab can run, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Experiment {
    /// Population histogram and one sample's histogram
    Histograms,
    /// Tight versus wide Gaussian sample means
    Spread,
    /// Continuous dice and the Central Limit Theorem
    Dice,
    /// Estimated mean versus sample size with error bars
    Sweep,
    /// Sample SD versus population SD
    StdDev,
    /// Miscoverage of 95% confidence intervals
    Coverage,
}

impl Experiment {
    pub const ALL: [Experiment; 6] = [
        Experiment::Histograms,
        Experiment::Spread,
        Experiment::Dice,
        Experiment::Sweep,
        Experiment::StdDev,
        Experiment::Coverage,
    ];
}

#[derive(Debug, Parser)]
#[command(name = "sampling-lab")]
#[command(about = "Sampling, Central Limit Theorem and confidence-interval experiments")]
#[command(version)]
pub struct Cli {
    /// Runner results file (comma-separated, no header)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Seed for the random number generator
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Confidence level for intervals (0.0-1.0); overrides the configured z value
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Number of coverage trials
    #[arg(long)]
    pub trials: Option<usize>,

    /// Run only these experiments (repeatable; default: all)
    #[arg(long, value_enum)]
    pub only: Vec<Experiment>,

    /// Also write the report as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Path to config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Experiments selected on the command line, in run order.
    pub fn experiments(&self) -> Vec<Experiment> {
        if self.only.is_empty() {
            return Experiment::ALL.to_vec();
        }
        let mut selected = self.only.clone();
        selected.sort();
        selected.dedup();
        selected
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    ///
    /// # Errors
    ///
    /// Returns an error if `--confidence-level` is outside (0, 1).
    pub fn apply_to_config(&self, config: &mut Config) -> Result<(), StatsError> {
        if let Some(data) = &self.data {
            config.data.path = data.clone();
        }

        if let Some(seed) = self.seed {
            config.sampling.seed = Some(seed);
        }

        if let Some(confidence_level) = self.confidence_level {
            config.interval.z_critical = z_critical(confidence_level)?;
        }

        if let Some(trials) = self.trials {
            config.interval.trials = trials;
        }

        Ok(())
    }
}
