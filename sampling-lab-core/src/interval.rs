//! Confidence intervals from the standard error and their empirical coverage.

use rand::RngCore;
use serde::Serialize;
use thiserror::Error;

use crate::experiment::{repeat_sample_summaries, ExperimentError};
use crate::sampler::WithoutReplacement;

/// Two-sided 95% critical value of the standard normal.
pub const DEFAULT_Z: f64 = 1.96;

/// Errors that can occur while constructing or evaluating intervals.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntervalError {
    /// Standard error is undefined for a sample of size zero.
    #[error("standard error needs a sample size of at least 1")]
    EmptySample,

    /// Coverage is undefined without any trials.
    #[error("coverage needs at least one trial")]
    NoTrials,

    /// Generating interval trials failed.
    #[error(transparent)]
    Experiment(#[from] ExperimentError),
}

/// A symmetric interval `mean ± z·SE`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn half_width(&self) -> f64 {
        (self.high - self.low) / 2.0
    }
}

/// The sample mean and standard error of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalTrial {
    pub sample_mean: f64,
    pub standard_error: f64,
}

impl IntervalTrial {
    pub fn interval(&self, z: f64) -> ConfidenceInterval {
        confidence_interval(self.sample_mean, self.standard_error, z)
    }

    /// Whether `population_mean` is strictly farther than `z·SE` from the
    /// sample mean.
    pub fn misses(&self, population_mean: f64, z: f64) -> bool {
        (population_mean - self.sample_mean).abs() > z * self.standard_error
    }
}

/// Which standard deviation feeds the standard error of each trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorEstimate {
    /// Plug in the sample's own standard deviation.
    SampleStdDev,
    /// Use a known population standard deviation.
    Known(f64),
}

/// `sample_std_dev / sqrt(sample_size)`.
///
/// # Errors
///
/// Returns [`IntervalError::EmptySample`] if `sample_size` is zero.
pub fn standard_error(sample_std_dev: f64, sample_size: usize) -> Result<f64, IntervalError> {
    if sample_size == 0 {
        return Err(IntervalError::EmptySample);
    }
    Ok(sample_std_dev / (sample_size as f64).sqrt())
}

/// `(sample_mean - z·SE, sample_mean + z·SE)`.
pub fn confidence_interval(sample_mean: f64, standard_error: f64, z: f64) -> ConfidenceInterval {
    let half_width = z * standard_error;
    ConfidenceInterval {
        low: sample_mean - half_width,
        high: sample_mean + half_width,
    }
}

/// Fraction of trials whose interval does not contain `population_mean`.
///
/// For a well-calibrated 95% interval this approaches 0.05 as the number of
/// trials grows. Plug-in standard errors from small samples drift from that.
///
/// # Errors
///
/// Returns [`IntervalError::NoTrials`] if `trials` is empty.
pub fn miscoverage_fraction(
    population_mean: f64,
    trials: &[IntervalTrial],
    z: f64,
) -> Result<f64, IntervalError> {
    if trials.is_empty() {
        return Err(IntervalError::NoTrials);
    }
    let misses = trials
        .iter()
        .filter(|t| t.misses(population_mean, z))
        .count();
    Ok(misses as f64 / trials.len() as f64)
}

/// Draw `num_trials` samples without replacement and record each sample's
/// mean and standard error.
///
/// # Errors
///
/// Fails on zero trials, a zero sample size, or a sample size larger than the
/// population.
pub fn interval_trials(
    population: &[f64],
    sample_size: usize,
    num_trials: usize,
    estimate: ErrorEstimate,
    rng: &mut dyn RngCore,
) -> Result<Vec<IntervalTrial>, IntervalError> {
    let summaries = repeat_sample_summaries(
        &WithoutReplacement::new(population),
        sample_size,
        num_trials,
        rng,
    )?;

    summaries
        .into_iter()
        .map(|summary| {
            let sd = match estimate {
                ErrorEstimate::SampleStdDev => summary.std_dev,
                ErrorEstimate::Known(sd) => sd,
            };
            Ok(IntervalTrial {
                sample_mean: summary.mean,
                standard_error: standard_error(sd, sample_size)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::synthetic_gaussian;
    use crate::stats::{mean, std_dev};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_standard_error() {
        assert_eq!(standard_error(10.0, 100).unwrap(), 1.0);
        assert_eq!(standard_error(3.0, 9).unwrap(), 1.0);
        assert_eq!(standard_error(3.0, 0), Err(IntervalError::EmptySample));
    }

    #[test]
    fn test_confidence_interval() {
        let ci = confidence_interval(10.0, 0.5, DEFAULT_Z);
        assert!((ci.low - 9.02).abs() < 1e-12);
        assert!((ci.high - 10.98).abs() < 1e-12);
        assert!((ci.midpoint() - 10.0).abs() < 1e-12);
        assert!((ci.half_width() - 0.98).abs() < 1e-12);
        assert!(ci.contains(10.5));
        assert!(!ci.contains(11.0));
    }

    #[test]
    fn test_interval_is_symmetric() {
        for (m, se) in [(0.0, 1.0), (-4.5, 0.01), (250.0, 3.7)] {
            let ci = confidence_interval(m, se, DEFAULT_Z);
            assert!(((m - ci.low) - (ci.high - m)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_miscoverage_counts_strict_misses() {
        let trials = [
            IntervalTrial {
                sample_mean: 10.0,
                standard_error: 1.0,
            },
            IntervalTrial {
                sample_mean: 13.0,
                standard_error: 1.0,
            },
            IntervalTrial {
                sample_mean: 8.5,
                standard_error: 1.0,
            },
            IntervalTrial {
                sample_mean: 5.0,
                standard_error: 1.0,
            },
        ];
        let fraction = miscoverage_fraction(10.0, &trials, DEFAULT_Z).unwrap();
        assert_eq!(fraction, 0.5);
    }

    #[test]
    fn test_miscoverage_without_trials() {
        assert_eq!(
            miscoverage_fraction(0.0, &[], DEFAULT_Z),
            Err(IntervalError::NoTrials)
        );
    }

    #[test]
    fn test_interval_trials_use_requested_estimate() {
        let population: Vec<f64> = (1..=100).map(f64::from).collect();
        let mut rng = StdRng::seed_from_u64(8);

        let known = interval_trials(&population, 25, 10, ErrorEstimate::Known(10.0), &mut rng)
            .unwrap();
        assert_eq!(known.len(), 10);
        assert!(known.iter().all(|t| (t.standard_error - 2.0).abs() < 1e-12));

        let plug_in =
            interval_trials(&population, 25, 10, ErrorEstimate::SampleStdDev, &mut rng).unwrap();
        assert!(plug_in.iter().all(|t| t.standard_error > 0.0));
    }

    #[test]
    fn test_interval_trials_reject_oversized_sample() {
        let population = [1.0, 2.0];
        let mut rng = StdRng::seed_from_u64(8);
        assert!(matches!(
            interval_trials(&population, 3, 10, ErrorEstimate::SampleStdDev, &mut rng),
            Err(IntervalError::Experiment(_))
        ));
    }

    #[test]
    fn test_miscoverage_near_five_percent() {
        let mut rng = StdRng::seed_from_u64(2012);
        let population = synthetic_gaussian(250.0, 45.0, 8000, &mut rng).unwrap();
        let population_mean = mean(&population).unwrap();
        let population_sd = std_dev(&population).unwrap();

        let known = interval_trials(
            &population,
            200,
            4000,
            ErrorEstimate::Known(population_sd),
            &mut rng,
        )
        .unwrap();
        let known_rate = miscoverage_fraction(population_mean, &known, DEFAULT_Z).unwrap();
        assert!((0.03..=0.07).contains(&known_rate), "rate {known_rate}");

        let plug_in =
            interval_trials(&population, 200, 4000, ErrorEstimate::SampleStdDev, &mut rng)
                .unwrap();
        let plug_in_rate = miscoverage_fraction(population_mean, &plug_in, DEFAULT_Z).unwrap();
        assert!((0.03..=0.08).contains(&plug_in_rate), "rate {plug_in_rate}");
    }
}
