use serde::Serialize;
use thiserror::Error;

/// Errors produced by descriptive statistics over a sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// The statistic is undefined for an empty sequence.
    #[error("cannot compute {0} of an empty sequence")]
    Empty(&'static str),

    /// A distribution or binning parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Mean and standard deviation of a sample or population.
///
/// Computed fresh from the values each time; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistic {
    pub mean: f64,
    pub std_dev: f64,
}

impl SummaryStatistic {
    /// Summarize a non-empty sequence of observations.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Empty`] if `xs` is empty.
    pub fn of(xs: &[f64]) -> Result<Self, StatsError> {
        Ok(Self {
            mean: mean(xs)?,
            std_dev: std_dev(xs)?,
        })
    }

    /// The variance implied by the standard deviation.
    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }
}

/// Arithmetic mean: `sum(xs) / len(xs)`.
///
/// # Errors
///
/// Returns [`StatsError::Empty`] if `xs` is empty.
pub fn mean(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.is_empty() {
        return Err(StatsError::Empty("mean"));
    }
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Population variance (divisor `n`, not `n - 1`).
///
/// Uses Welford's running update, which leaves the accumulated squared
/// deviation at exactly zero while every element equals the running mean.
///
/// # Errors
///
/// Returns [`StatsError::Empty`] if `xs` is empty.
pub fn variance(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.is_empty() {
        return Err(StatsError::Empty("variance"));
    }

    let mut running_mean = 0.0;
    let mut sum_sq_diff = 0.0;
    for (i, &x) in xs.iter().enumerate() {
        let delta = x - running_mean;
        running_mean += delta / (i + 1) as f64;
        sum_sq_diff += delta * (x - running_mean);
    }

    Ok(sum_sq_diff / xs.len() as f64)
}

/// Population standard deviation, `sqrt(variance(xs))`.
///
/// Always non-negative; zero exactly when all elements are equal.
///
/// # Errors
///
/// Returns [`StatsError::Empty`] if `xs` is empty.
pub fn std_dev(xs: &[f64]) -> Result<f64, StatsError> {
    Ok(variance(xs)?.sqrt())
}

mod histogram;
mod normal;

pub use histogram::Histogram;
pub use normal::{probability_within, z_critical};
