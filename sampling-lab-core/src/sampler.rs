//! Drawing samples from a population or from a parametric distribution.
//!
//! Every function takes its random source explicitly, so a seeded generator
//! gives reproducible samples and separate workers can own separate
//! generators.

use rand::{seq::IndexedRandom, Rng};
use rand_distr::{Distribution, Normal};
use thiserror::Error;

/// Errors that can occur while drawing a sample.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    /// Sampling without replacement asked for more elements than exist.
    #[error("cannot draw {requested} values without replacement from a population of {available}")]
    SampleTooLarge { requested: usize, available: usize },

    /// A distribution parameter is out of range.
    #[error("invalid distribution parameter: {0}")]
    InvalidParameter(String),
}

/// Draw `k` distinct elements of `population` uniformly at random.
///
/// Positions, not values, are distinct: a population containing duplicate
/// values may yield duplicates. The returned order is random.
///
/// # Errors
///
/// Returns [`SamplingError::SampleTooLarge`] if `k` exceeds the population size.
pub fn sample_without_replacement<R>(
    population: &[f64],
    k: usize,
    rng: &mut R,
) -> Result<Vec<f64>, SamplingError>
where
    R: Rng + ?Sized,
{
    if k > population.len() {
        return Err(SamplingError::SampleTooLarge {
            requested: k,
            available: population.len(),
        });
    }
    Ok(population.choose_multiple(rng, k).copied().collect())
}

/// Draw `k` independent values from Normal(mu, sigma²).
///
/// # Errors
///
/// Returns [`SamplingError::InvalidParameter`] if `sigma` is negative or
/// either parameter is not finite.
pub fn synthetic_gaussian<R>(
    mu: f64,
    sigma: f64,
    k: usize,
    rng: &mut R,
) -> Result<Vec<f64>, SamplingError>
where
    R: Rng + ?Sized,
{
    if !mu.is_finite() || !sigma.is_finite() || sigma < 0.0 {
        return Err(SamplingError::InvalidParameter(format!(
            "gaussian needs finite mu and non-negative sigma, got mu={mu}, sigma={sigma}"
        )));
    }
    let normal = Normal::new(mu, sigma)
        .map_err(|e| SamplingError::InvalidParameter(format!("sigma={sigma}: {e}")))?;
    Ok((0..k).map(|_| normal.sample(rng)).collect())
}

/// Draw `k` independent values uniform on `[0, scale)`.
///
/// With `scale = 5.0` this is the "continuous die" used in the dice
/// experiments.
///
/// # Errors
///
/// Returns [`SamplingError::InvalidParameter`] unless `scale` is a positive
/// finite number.
pub fn synthetic_uniform_scaled<R>(
    scale: f64,
    k: usize,
    rng: &mut R,
) -> Result<Vec<f64>, SamplingError>
where
    R: Rng + ?Sized,
{
    if !(scale.is_finite() && scale > 0.0) {
        return Err(SamplingError::InvalidParameter(format!(
            "uniform scale must be positive and finite, got {scale}"
        )));
    }
    Ok((0..k).map(|_| scale * rng.random::<f64>()).collect())
}

/// A way of producing a sample of a requested size.
pub trait SamplingStrategy {
    /// Draw one sample of `size` values.
    fn draw(&self, size: usize, rng: &mut dyn rand::RngCore) -> Result<Vec<f64>, SamplingError>;
}

/// Sample without replacement from a borrowed population.
#[derive(Debug, Clone, Copy)]
pub struct WithoutReplacement<'a> {
    pub population: &'a [f64],
}

impl<'a> WithoutReplacement<'a> {
    pub fn new(population: &'a [f64]) -> Self {
        Self { population }
    }
}

impl SamplingStrategy for WithoutReplacement<'_> {
    fn draw(&self, size: usize, rng: &mut dyn rand::RngCore) -> Result<Vec<f64>, SamplingError> {
        sample_without_replacement(self.population, size, rng)
    }
}

/// Synthetic i.i.d. draws from Normal(mu, sigma²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    pub mu: f64,
    pub sigma: f64,
}

impl Gaussian {
    pub fn new(mu: f64, sigma: f64) -> Self {
        Self { mu, sigma }
    }
}

impl SamplingStrategy for Gaussian {
    fn draw(&self, size: usize, rng: &mut dyn rand::RngCore) -> Result<Vec<f64>, SamplingError> {
        synthetic_gaussian(self.mu, self.sigma, size, rng)
    }
}

/// Synthetic i.i.d. draws uniform on `[0, scale)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformScaled {
    pub scale: f64,
}

impl UniformScaled {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl SamplingStrategy for UniformScaled {
    fn draw(&self, size: usize, rng: &mut dyn rand::RngCore) -> Result<Vec<f64>, SamplingError> {
        synthetic_uniform_scaled(self.scale, size, rng)
    }
}
