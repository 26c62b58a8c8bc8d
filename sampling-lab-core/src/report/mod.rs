use serde::Serialize;
use thiserror::Error;

use crate::experiment::{ConvergencePoint, SweepPoint};
use crate::stats::{Histogram, SummaryStatistic};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A histogram with title, axis labels and a mean/SD annotation.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramPanel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub histogram: Histogram,
    pub summary: SummaryStatistic,
    /// Show bin heights as fractions of the total instead of counts.
    pub relative: bool,
}

/// A labelled scalar printed as one console line.
#[derive(Debug, Clone, Serialize)]
pub struct LabelledValue {
    pub label: String,
    pub value: f64,
}

/// One named sequence, plotted against its 1-based position.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

/// Line plot of one or more sequences against trial number.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesPanel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValuePanel {
    pub title: String,
    pub values: Vec<LabelledValue>,
}

/// Estimated mean versus sample size, with `z · std_of_means` error bars and
/// a reference line at the population mean.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBarPanel {
    pub title: String,
    pub z: f64,
    pub population_mean: f64,
    pub points: Vec<SweepPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvergencePanel {
    pub title: String,
    pub population_std_dev: f64,
    pub points: Vec<ConvergencePoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoveragePanel {
    pub title: String,
    pub confidence_label: String,
    pub sample_size: usize,
    pub trials: usize,
    pub plug_in_miscoverage: f64,
    pub known_sd_miscoverage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Histogram(HistogramPanel),
    Values(ValuePanel),
    Series(SeriesPanel),
    ErrorBars(ErrorBarPanel),
    Convergence(ConvergencePanel),
    Coverage(CoveragePanel),
}

/// Everything one run of the lab computed, in the order it was computed.
#[derive(Debug, Clone, Serialize)]
pub struct LabReport {
    pub seed: u64,
    pub population_size: usize,
    pub sections: Vec<Section>,
}

pub trait Reporter: Send + Sync {
    fn report(&self, report: &LabReport) -> Result<(), ReportError>;
}

mod json;
mod terminal;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;
