//! Core computations for sampling-lab.
//!
//! This crate holds the pure statistics behind the lab: descriptive
//! statistics, sampling, repeated-trial experiments and confidence-interval
//! coverage, plus the report model the presentation layer renders. Every
//! function that draws random numbers takes its generator as a parameter.

pub mod experiment;
pub mod interval;
pub mod report;
pub mod sampler;
pub mod stats;

// Re-export main types for convenience
pub use experiment::{ConvergencePoint, ExperimentError, SweepPoint};
pub use interval::{
    ConfidenceInterval, ErrorEstimate, IntervalError, IntervalTrial, DEFAULT_Z,
};
pub use report::{JsonReporter, LabReport, ReportError, Reporter, Section, TerminalReporter};
pub use sampler::{Gaussian, SamplingError, SamplingStrategy, UniformScaled, WithoutReplacement};
pub use stats::{Histogram, StatsError, SummaryStatistic};
