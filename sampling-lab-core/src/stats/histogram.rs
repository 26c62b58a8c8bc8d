use serde::Serialize;

use super::StatsError;

/// Equal-width histogram of a numeric sequence.
///
/// Bins span `[lower, upper]`; each bin is half-open except the last, which
/// also includes `upper` so the maximum value is always counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `xs` into `bins` equal-width buckets between its minimum and maximum.
    ///
    /// A constant sequence has no spread to divide, so it gets a single
    /// unit-width bin centred on the value, padded with empty bins.
    ///
    /// # Errors
    ///
    /// Returns an error if `xs` is empty, `bins` is zero, or any value is not
    /// finite.
    pub fn new(xs: &[f64], bins: usize) -> Result<Self, StatsError> {
        if xs.is_empty() {
            return Err(StatsError::Empty("histogram"));
        }
        if bins == 0 {
            return Err(StatsError::InvalidParameter(
                "histogram needs at least one bin".to_string(),
            ));
        }
        if let Some(bad) = xs.iter().find(|x| !x.is_finite()) {
            return Err(StatsError::InvalidParameter(format!(
                "cannot bin non-finite value {bad}"
            )));
        }

        let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (lower, bin_width) = if max > min {
            (min, (max - min) / bins as f64)
        } else {
            (min - 0.5, 1.0)
        };
        let upper = lower + bin_width * bins as f64;

        let mut counts = vec![0; bins];
        for &x in xs {
            let idx = ((x - lower) / bin_width).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Ok(Self {
            lower,
            upper,
            bin_width,
            counts,
        })
    }

    /// Total number of binned observations.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Count of each bin divided by the total, so the frequencies sum to one.
    pub fn relative_frequencies(&self) -> Vec<f64> {
        let total = self.total() as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }

    /// `(start, end)` of every bin, in order.
    pub fn bin_edges(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        (0..self.counts.len()).map(move |i| {
            let start = self.lower + self.bin_width * i as f64;
            (start, start + self.bin_width)
        })
    }
}
