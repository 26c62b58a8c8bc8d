//! Repeated-sampling experiments.
//!
//! Each experiment runs independent trials sequentially against one random
//! source and collects a per-trial statistic. Only the output accumulator and
//! the generator carry state between trials.

use rand::RngCore;
use serde::Serialize;
use thiserror::Error;

use crate::sampler::{SamplingError, SamplingStrategy, UniformScaled, WithoutReplacement};
use crate::stats::{self, StatsError, SummaryStatistic};

/// Errors that can occur while running an experiment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExperimentError {
    /// The experiment was asked to run zero trials.
    #[error("experiment needs at least one trial")]
    NoTrials,

    /// Each trial would draw an empty sample.
    #[error("sample size must be at least 1")]
    EmptySample,

    /// Drawing a sample failed.
    #[error(transparent)]
    Sampling(#[from] SamplingError),

    /// Summarizing a sample failed.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Aggregate of repeated sample means at one sample size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub sample_size: usize,
    pub mean_of_means: f64,
    pub std_of_means: f64,
}

/// Average distance between sample and population standard deviation at one
/// sample size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergencePoint {
    pub sample_size: usize,
    pub mean_abs_diff: f64,
}

fn check_shape(sample_size: usize, num_trials: usize) -> Result<(), ExperimentError> {
    if num_trials == 0 {
        return Err(ExperimentError::NoTrials);
    }
    if sample_size == 0 {
        return Err(ExperimentError::EmptySample);
    }
    Ok(())
}

/// Draw `num_trials` samples of `sample_size` and record each sample's mean.
///
/// The returned sequence has exactly `num_trials` entries, in trial order.
///
/// # Errors
///
/// Fails on zero trials, an empty sample size, or if the strategy cannot draw
/// a sample of the requested size.
pub fn repeat_sample_means(
    strategy: &dyn SamplingStrategy,
    sample_size: usize,
    num_trials: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<f64>, ExperimentError> {
    check_shape(sample_size, num_trials)?;

    let mut means = Vec::with_capacity(num_trials);
    for _ in 0..num_trials {
        let sample = strategy.draw(sample_size, rng)?;
        means.push(stats::mean(&sample)?);
    }
    Ok(means)
}

/// Like [`repeat_sample_means`], also recording each sample's standard
/// deviation.
///
/// # Errors
///
/// Same conditions as [`repeat_sample_means`].
pub fn repeat_sample_summaries(
    strategy: &dyn SamplingStrategy,
    sample_size: usize,
    num_trials: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<SummaryStatistic>, ExperimentError> {
    check_shape(sample_size, num_trials)?;

    let mut summaries = Vec::with_capacity(num_trials);
    for _ in 0..num_trials {
        let sample = strategy.draw(sample_size, rng)?;
        summaries.push(SummaryStatistic::of(&sample)?);
    }
    Ok(summaries)
}

/// For each sample size, run `sub_trials` trials and aggregate the sample
/// means into their mean and standard deviation.
///
/// This is the data behind an error-bar plot of the estimated population mean
/// against sample size.
///
/// # Errors
///
/// Fails if `sub_trials` is zero or any size cannot be sampled.
pub fn sample_size_sweep(
    strategy: &dyn SamplingStrategy,
    sample_sizes: &[usize],
    sub_trials: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<SweepPoint>, ExperimentError> {
    sample_sizes
        .iter()
        .map(|&sample_size| {
            let means = repeat_sample_means(strategy, sample_size, sub_trials, rng)?;
            let summary = SummaryStatistic::of(&means)?;
            Ok(SweepPoint {
                sample_size,
                mean_of_means: summary.mean,
                std_of_means: summary.std_dev,
            })
        })
        .collect()
}

/// For each sample size, average `|population SD - sample SD|` over `trials`
/// samples drawn without replacement.
///
/// # Errors
///
/// Fails if the population is empty, `trials` is zero, or a size exceeds the
/// population.
pub fn std_dev_convergence(
    population: &[f64],
    sample_sizes: &[usize],
    trials: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<ConvergencePoint>, ExperimentError> {
    let population_sd = stats::std_dev(population)?;
    let strategy = WithoutReplacement::new(population);

    sample_sizes
        .iter()
        .map(|&sample_size| {
            let summaries = repeat_sample_summaries(&strategy, sample_size, trials, rng)?;
            let diffs: Vec<f64> = summaries
                .iter()
                .map(|s| (population_sd - s.std_dev).abs())
                .collect();
            Ok(ConvergencePoint {
                sample_size,
                mean_abs_diff: stats::mean(&diffs)?,
            })
        })
        .collect()
}

/// Roll `dice_thrown` continuous dice on `[0, scale)`, grouped into trials of
/// `dice_per_trial`, and return the mean roll of each trial.
///
/// Produces `dice_thrown / dice_per_trial` means; leftover dice are not
/// rolled.
///
/// # Errors
///
/// Fails if `dice_per_trial` is zero, fewer dice are thrown than fit in one
/// trial, or `scale` is not positive.
pub fn dice_means(
    scale: f64,
    dice_per_trial: usize,
    dice_thrown: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<f64>, ExperimentError> {
    if dice_per_trial == 0 {
        return Err(ExperimentError::EmptySample);
    }
    let num_trials = dice_thrown / dice_per_trial;
    repeat_sample_means(&UniformScaled::new(scale), dice_per_trial, num_trials, rng)
}
