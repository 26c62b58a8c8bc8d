//! Runs the lab's experiments over a population of finishing times.
//!
//! The lab owns a single seeded generator and runs every selected experiment
//! in order, collecting the computed results into a [`LabReport`] for the
//! reporters to render.

use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use sampling_lab_core::experiment::{self, ExperimentError};
use sampling_lab_core::interval::{self, ErrorEstimate, IntervalError};
use sampling_lab_core::report::{
    ConvergencePanel, CoveragePanel, ErrorBarPanel, HistogramPanel, LabReport, LabelledValue,
    Section, Series, SeriesPanel, ValuePanel,
};
use sampling_lab_core::sampler::{self, Gaussian, SamplingError, WithoutReplacement};
use sampling_lab_core::stats::{self, Histogram, StatsError, SummaryStatistic};

use crate::cli::Experiment;
use crate::config::Config;

/// Errors that can occur while running the lab.
#[derive(Debug, Error)]
pub enum LabError {
    /// The population has no observations.
    #[error("Population is empty")]
    EmptyPopulation,

    /// Every configured sample size is larger than the population.
    #[error("No sample size for {experiment:?} fits a population of {population}")]
    NoUsableSampleSizes {
        experiment: Experiment,
        population: usize,
    },

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Experiment(#[from] ExperimentError),

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

const TIME_LABEL: &str = "Minutes to Complete Race";
const RUNNERS_LABEL: &str = "Number of Runners";

/// Runs the configured experiments with one explicit random source.
#[derive(Debug)]
pub struct Lab {
    config: Config,
    experiments: Vec<Experiment>,
    seed: u64,
    rng: StdRng,
}

impl Lab {
    /// Create a lab for `experiments`.
    ///
    /// The generator is seeded from `config.sampling.seed`, or from a fresh
    /// random seed when none is configured. Either way the seed is recorded
    /// in the report so the run can be repeated.
    pub fn new(config: Config, experiments: Vec<Experiment>) -> Self {
        let seed = config
            .sampling
            .seed
            .unwrap_or_else(|| rand::rng().random());
        Self {
            config,
            experiments,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed driving this lab's generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run every selected experiment over `population`.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is empty or any experiment fails;
    /// nothing is reported for a partial run.
    pub fn run(&mut self, population: &[f64]) -> Result<LabReport, LabError> {
        if population.is_empty() {
            return Err(LabError::EmptyPopulation);
        }
        info!(
            "Running {} experiments over {} runners (seed {})",
            self.experiments.len(),
            population.len(),
            self.seed
        );

        let mut sections = Vec::new();
        for experiment in self.experiments.clone() {
            info!("Running {:?}", experiment);
            let produced = match experiment {
                Experiment::Histograms => self.histograms(population)?,
                Experiment::Spread => self.spread()?,
                Experiment::Dice => self.dice()?,
                Experiment::Sweep => self.sweep(population)?,
                Experiment::StdDev => self.std_dev(population)?,
                Experiment::Coverage => self.coverage(population)?,
            };
            sections.extend(produced);
        }

        Ok(LabReport {
            seed: self.seed,
            population_size: population.len(),
            sections,
        })
    }

    fn histograms(&mut self, population: &[f64]) -> Result<Vec<Section>, LabError> {
        let cfg = &self.config.histograms;
        debug!(?cfg, "histogram settings");

        let sample =
            sampler::sample_without_replacement(population, cfg.sample_size, &mut self.rng)?;

        Ok(vec![
            Section::Histogram(HistogramPanel {
                title: "Marathon Finishing Times".to_string(),
                x_label: TIME_LABEL.to_string(),
                y_label: RUNNERS_LABEL.to_string(),
                histogram: Histogram::new(population, cfg.population_bins)?,
                summary: SummaryStatistic::of(population)?,
                relative: false,
            }),
            Section::Histogram(HistogramPanel {
                title: format!("Sample of Size {}", cfg.sample_size),
                x_label: TIME_LABEL.to_string(),
                y_label: RUNNERS_LABEL.to_string(),
                histogram: Histogram::new(&sample, cfg.sample_bins)?,
                summary: SummaryStatistic::of(&sample)?,
                relative: false,
            }),
        ])
    }

    fn spread(&mut self) -> Result<Vec<Section>, LabError> {
        let cfg = &self.config.spread;
        debug!(?cfg, "spread settings");

        let mut values = Vec::new();
        for (name, sd) in [("tight", cfg.tight_sd), ("wide", cfg.wide_sd)] {
            values.push(LabelledValue {
                label: format!(
                    "Probability of being within {} of true mean of {} dist.",
                    cfg.bound, name
                ),
                value: stats::probability_within(0.0, sd, -cfg.bound, cfg.bound)?,
            });
        }

        let tight = experiment::repeat_sample_means(
            &Gaussian::new(0.0, cfg.tight_sd),
            cfg.sample_size,
            cfg.trials,
            &mut self.rng,
        )?;
        let wide = experiment::repeat_sample_means(
            &Gaussian::new(0.0, cfg.wide_sd),
            cfg.sample_size,
            cfg.trials,
            &mut self.rng,
        )?;

        let mut means_panel = ValuePanel {
            title: format!("Means of Sample Size {}", cfg.sample_size),
            values: Vec::new(),
        };
        for (sd, means) in [(cfg.tight_sd, &tight), (cfg.wide_sd, &wide)] {
            let summary = SummaryStatistic::of(means)?;
            means_panel.values.extend([
                LabelledValue {
                    label: format!("Mean of sample means (SD = {sd})"),
                    value: summary.mean,
                },
                LabelledValue {
                    label: format!("SD of sample means (SD = {sd})"),
                    value: summary.std_dev,
                },
                LabelledValue {
                    label: format!("Expected SD of sample means (SD = {sd})"),
                    value: interval::standard_error(sd, cfg.sample_size)?,
                },
            ]);
        }

        let wide_histogram = HistogramPanel {
            title: format!("Distribution of Sample Means (SD = {})", cfg.wide_sd),
            x_label: "Sample Mean".to_string(),
            y_label: "Frequency of Occurrence".to_string(),
            histogram: Histogram::new(&wide, cfg.bins)?,
            summary: SummaryStatistic::of(&wide)?,
            relative: false,
        };
        let sequences = SeriesPanel {
            title: format!("Sample Means of Size {}", cfg.sample_size),
            x_label: "Sample Number".to_string(),
            y_label: "Value of Sample Mean".to_string(),
            series: vec![
                Series {
                    label: format!("SD = {}", cfg.tight_sd),
                    values: tight,
                },
                Series {
                    label: format!("SD = {}", cfg.wide_sd),
                    values: wide,
                },
            ],
        };

        Ok(vec![
            Section::Values(ValuePanel {
                title: "Effect of Variance on Estimate of Mean".to_string(),
                values,
            }),
            Section::Series(sequences),
            Section::Values(means_panel),
            Section::Histogram(wide_histogram),
        ])
    }

    fn dice(&mut self) -> Result<Vec<Section>, LabError> {
        let cfg = &self.config.dice;
        debug!(?cfg, "dice settings");

        let mut sections = Vec::new();
        let mut values = Vec::new();
        for &per_trial in &cfg.dice_per_trial {
            let means =
                experiment::dice_means(cfg.scale, per_trial, cfg.dice_thrown, &mut self.rng)?;
            let name = if per_trial == 1 {
                "1 die".to_string()
            } else {
                format!("{per_trial} dice")
            };

            values.push(LabelledValue {
                label: format!("Mean of rolling {name}"),
                value: stats::mean(&means)?,
            });
            values.push(LabelledValue {
                label: format!("Variance of rolling {name}"),
                value: stats::variance(&means)?,
            });
            sections.push(Section::Histogram(HistogramPanel {
                title: format!("Rolling Continuous Dice: mean of {name}"),
                x_label: "Value".to_string(),
                y_label: "Probability".to_string(),
                histogram: Histogram::new(&means, cfg.bins)?,
                summary: SummaryStatistic::of(&means)?,
                relative: true,
            }));
        }

        sections.push(Section::Values(ValuePanel {
            title: "The Central Limit Theorem".to_string(),
            values,
        }));
        Ok(sections)
    }

    fn sweep(&mut self, population: &[f64]) -> Result<Vec<Section>, LabError> {
        let cfg = &self.config.sweep;
        debug!(?cfg, "sweep settings");

        let sizes = fitting_sizes(Experiment::Sweep, cfg.sample_sizes(), population.len())?;
        let points = experiment::sample_size_sweep(
            &WithoutReplacement::new(population),
            &sizes,
            cfg.sub_trials,
            &mut self.rng,
        )?;

        Ok(vec![Section::ErrorBars(ErrorBarPanel {
            title: "Estimates of Mean Finishing Time".to_string(),
            z: self.config.interval.z_critical,
            population_mean: stats::mean(population)?,
            points,
        })])
    }

    fn std_dev(&mut self, population: &[f64]) -> Result<Vec<Section>, LabError> {
        let cfg = &self.config.std_dev;
        debug!(?cfg, "std_dev settings");

        let sizes = fitting_sizes(Experiment::StdDev, cfg.sample_sizes(), population.len())?;
        let points =
            experiment::std_dev_convergence(population, &sizes, cfg.trials, &mut self.rng)?;

        Ok(vec![Section::Convergence(ConvergencePanel {
            title: "Sample SD vs. Popn SD".to_string(),
            population_std_dev: stats::std_dev(population)?,
            points,
        })])
    }

    fn coverage(&mut self, population: &[f64]) -> Result<Vec<Section>, LabError> {
        let cfg = &self.config.interval;
        debug!(?cfg, "interval settings");

        let population_mean = stats::mean(population)?;
        let population_sd = stats::std_dev(population)?;

        let plug_in = interval::interval_trials(
            population,
            cfg.sample_size,
            cfg.trials,
            ErrorEstimate::SampleStdDev,
            &mut self.rng,
        )?;
        let known = interval::interval_trials(
            population,
            cfg.sample_size,
            cfg.trials,
            ErrorEstimate::Known(population_sd),
            &mut self.rng,
        )?;

        let plug_in_miscoverage =
            interval::miscoverage_fraction(population_mean, &plug_in, cfg.z_critical)?;
        let known_sd_miscoverage =
            interval::miscoverage_fraction(population_mean, &known, cfg.z_critical)?;
        info!(
            "Fraction outside confidence interval: {:.4} (sample SD), {:.4} (population SD)",
            plug_in_miscoverage, known_sd_miscoverage
        );

        Ok(vec![Section::Coverage(CoveragePanel {
            title: "Standard Error of the Mean".to_string(),
            confidence_label: confidence_label(cfg.z_critical)?,
            sample_size: cfg.sample_size,
            trials: cfg.trials,
            plug_in_miscoverage,
            known_sd_miscoverage,
        })])
    }
}

/// Keep the sample sizes that can be drawn without replacement.
fn fitting_sizes(
    experiment: Experiment,
    sizes: Vec<usize>,
    population: usize,
) -> Result<Vec<usize>, LabError> {
    let (fitting, dropped): (Vec<usize>, Vec<usize>) =
        sizes.into_iter().partition(|&size| size <= population);

    if !dropped.is_empty() {
        warn!(
            "{:?}: dropping sample sizes {:?} larger than the population of {}",
            experiment, dropped, population
        );
    }
    if fitting.is_empty() {
        return Err(LabError::NoUsableSampleSizes {
            experiment,
            population,
        });
    }
    Ok(fitting)
}

/// Two-sided confidence implied by `z`, e.g. "95%" for 1.96.
fn confidence_label(z: f64) -> Result<String, StatsError> {
    let confidence = stats::probability_within(0.0, 1.0, -z, z)?;
    Ok(format!("{:.0}%", confidence * 100.0))
}
