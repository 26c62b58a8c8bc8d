//! sampling-lab: sampling theory and confidence intervals, by experiment
//!
//! This library loads marathon finishing times and runs repeated-sampling
//! experiments over them: sample histograms, the Central Limit Theorem with
//! synthetic dice and Gaussians, mean estimates by sample size, and the
//! empirical coverage of standard-error confidence intervals.

pub mod cli;
pub mod config;
pub mod data;
pub mod lab;
pub mod logging;

// Re-export core types for convenience
pub use sampling_lab_core::report::{
    JsonReporter, LabReport, ReportError, Reporter, TerminalReporter,
};
pub use sampling_lab_core::stats::{SummaryStatistic, StatsError};

// Re-export main types from this crate
pub use cli::{Cli, Experiment};
pub use config::Config;
pub use data::{load_records, DataError, RunnerRecord};
pub use lab::{Lab, LabError};
