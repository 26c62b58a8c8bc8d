use statrs::distribution::{ContinuousCDF, Normal};

use super::StatsError;

fn normal(mu: f64, sigma: f64) -> Result<Normal, StatsError> {
    if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
        return Err(StatsError::InvalidParameter(format!(
            "normal needs a finite mean and positive standard deviation, got mu={mu}, sigma={sigma}"
        )));
    }
    Normal::new(mu, sigma).map_err(|e| StatsError::InvalidParameter(e.to_string()))
}

/// Probability that a Normal(mu, sigma²) draw lands in `[low, high]`.
///
/// This is the area under the Gaussian density between the two bounds,
/// computed from the CDF rather than by numerical integration.
///
/// # Errors
///
/// Returns [`StatsError::InvalidParameter`] if `sigma` is not a positive
/// finite number or the bounds are reversed.
pub fn probability_within(mu: f64, sigma: f64, low: f64, high: f64) -> Result<f64, StatsError> {
    if low > high {
        return Err(StatsError::InvalidParameter(format!(
            "lower bound {low} exceeds upper bound {high}"
        )));
    }
    let dist = normal(mu, sigma)?;
    Ok(dist.cdf(high) - dist.cdf(low))
}

/// Two-sided critical value of the standard normal for a confidence level.
///
/// `z_critical(0.95)` is approximately 1.96.
///
/// # Errors
///
/// Returns [`StatsError::InvalidParameter`] unless `0 < confidence_level < 1`.
pub fn z_critical(confidence_level: f64) -> Result<f64, StatsError> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(StatsError::InvalidParameter(format!(
            "confidence level must be between 0 and 1 (exclusive), got {confidence_level}"
        )));
    }
    let standard = normal(0.0, 1.0)?;
    let alpha = 1.0 - confidence_level;
    Ok(standard.inverse_cdf(1.0 - alpha / 2.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_within_three_of_tight_distribution() {
        let p = probability_within(0.0, 1.0, -3.0, 3.0).unwrap();
        assert!((p - 0.9973).abs() < 1e-4);
    }

    #[test]
    fn test_probability_within_three_of_wide_distribution() {
        let p = probability_within(0.0, 100.0, -3.0, 3.0).unwrap();
        assert!((p - 0.0239).abs() < 1e-4);
    }

    #[test]
    fn test_probability_within_rejects_bad_parameters() {
        assert!(probability_within(0.0, 0.0, -1.0, 1.0).is_err());
        assert!(probability_within(0.0, -2.0, -1.0, 1.0).is_err());
        assert!(probability_within(0.0, f64::NAN, -1.0, 1.0).is_err());
        assert!(probability_within(0.0, 1.0, 1.0, -1.0).is_err());
    }

    #[test]
    fn test_z_critical() {
        assert!((z_critical(0.95).unwrap() - 1.96).abs() < 1e-3);
        assert!((z_critical(0.99).unwrap() - 2.5758).abs() < 1e-3);
        assert!((z_critical(0.90).unwrap() - 1.6449).abs() < 1e-3);
    }

    #[test]
    fn test_z_critical_out_of_range() {
        assert!(z_critical(0.0).is_err());
        assert!(z_critical(1.0).is_err());
        assert!(z_critical(1.5).is_err());
        assert!(z_critical(f64::NAN).is_err());
    }
}
