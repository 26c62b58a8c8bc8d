use std::io::{self, Write};

use colored::Colorize;

use super::{
    ConvergencePanel, CoveragePanel, ErrorBarPanel, HistogramPanel, LabReport, ReportError,
    Reporter, Section, SeriesPanel, ValuePanel,
};
use crate::interval::confidence_interval;

/// Widest bar drawn for a histogram bin.
const BAR_WIDTH: usize = 50;

/// Longest series listing before it is downsampled.
const MAX_SERIES_ROWS: usize = 20;

/// Miscoverage rates outside this band suggest a broken interval or sampler.
const PLAUSIBLE_MISCOVERAGE: std::ops::RangeInclusive<f64> = 0.03..=0.08;

/// A reporter that prints lab results to the terminal as text plots.
#[derive(Debug, Clone)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn verdict(&self, text: &str, good: bool) -> String {
        match (self.use_colors, good) {
            (false, _) => text.to_string(),
            (true, true) => text.green().to_string(),
            (true, false) => text.red().bold().to_string(),
        }
    }

    /// Scale `value` against `max` into a bar of at most [`BAR_WIDTH`] cells.
    fn bar(value: f64, max: f64) -> String {
        if max <= 0.0 {
            return String::new();
        }
        let cells = ((value / max) * BAR_WIDTH as f64).round() as usize;
        "#".repeat(cells.min(BAR_WIDTH))
    }

    /// Indices of a `len`-long series to list: every point for short series,
    /// otherwise an even stride that always ends on the last point.
    fn series_rows(len: usize) -> Vec<usize> {
        if len <= MAX_SERIES_ROWS {
            return (0..len).collect();
        }
        let step = len.div_ceil(MAX_SERIES_ROWS);
        let mut rows: Vec<usize> = (0..len).step_by(step).collect();
        if rows.last() != Some(&(len - 1)) {
            rows.push(len - 1);
        }
        rows
    }

    fn print_title(&self, writer: &mut impl Write, title: &str) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", self.bold(title))?;
        writeln!(writer, "{}", "-".repeat(78))?;
        Ok(())
    }

    fn print_histogram(&self, writer: &mut impl Write, panel: &HistogramPanel) -> io::Result<()> {
        self.print_title(writer, &panel.title)?;
        writeln!(writer, "{:>23} | {}", panel.x_label, panel.y_label)?;

        let heights: Vec<f64> = if panel.relative {
            panel.histogram.relative_frequencies()
        } else {
            panel.histogram.counts.iter().map(|&c| c as f64).collect()
        };
        let max = heights.iter().copied().fold(0.0, f64::max);

        for ((start, end), height) in panel.histogram.bin_edges().zip(&heights) {
            let label = if panel.relative {
                format!("{height:.4}")
            } else {
                format!("{height}")
            };
            writeln!(
                writer,
                "{:>10.2} - {:<10.2} | {} {}",
                start,
                end,
                Self::bar(*height, max),
                label
            )?;
        }

        writeln!(writer, "Mean = {:.2}", panel.summary.mean)?;
        writeln!(writer, "SD = {:.2}", panel.summary.std_dev)?;
        Ok(())
    }

    fn print_values(&self, writer: &mut impl Write, panel: &ValuePanel) -> io::Result<()> {
        self.print_title(writer, &panel.title)?;
        for value in &panel.values {
            writeln!(writer, "{} = {:.4}", value.label, value.value)?;
        }
        Ok(())
    }

    fn print_series(&self, writer: &mut impl Write, panel: &SeriesPanel) -> io::Result<()> {
        self.print_title(writer, &panel.title)?;
        writeln!(writer, "{}", panel.y_label)?;

        let mut header = format!("{:>14}", panel.x_label);
        for series in &panel.series {
            header.push_str(&format!(" {:>14}", series.label));
        }
        writeln!(writer, "{}", self.bold(&header))?;

        let len = panel.series.iter().map(|s| s.values.len()).max().unwrap_or(0);
        let rows = Self::series_rows(len);
        for &i in &rows {
            let mut line = format!("{:>14}", i + 1);
            for series in &panel.series {
                match series.values.get(i) {
                    Some(value) => line.push_str(&format!(" {value:>14.4}")),
                    None => line.push_str(&format!(" {:>14}", "")),
                }
            }
            writeln!(writer, "{line}")?;
        }
        if rows.len() < len {
            writeln!(writer, "({} of {} points shown)", rows.len(), len)?;
        }
        Ok(())
    }

    fn print_error_bars(&self, writer: &mut impl Write, panel: &ErrorBarPanel) -> io::Result<()> {
        self.print_title(writer, &panel.title)?;
        writeln!(writer, "Population mean = {:.2}", panel.population_mean)?;
        writeln!(
            writer,
            "{}",
            self.bold(&format!(
                "{:>12} {:>16} {:>24} {:>12}",
                "Sample size", "Estimated mean", "Interval", "Covers mean"
            ))
        )?;

        for point in &panel.points {
            let ci = confidence_interval(point.mean_of_means, point.std_of_means, panel.z);
            let covers = ci.contains(panel.population_mean);
            let interval = format!("[{:.2}, {:.2}]", ci.low, ci.high);
            // Pad before coloring so escape codes don't break alignment.
            let verdict = format!("{:>12}", if covers { "yes" } else { "no" });
            writeln!(
                writer,
                "{:>12} {:>16.2} {:>24} {}",
                point.sample_size,
                point.mean_of_means,
                interval,
                self.verdict(&verdict, covers)
            )?;
        }
        Ok(())
    }

    fn print_convergence(
        &self,
        writer: &mut impl Write,
        panel: &ConvergencePanel,
    ) -> io::Result<()> {
        self.print_title(writer, &panel.title)?;
        writeln!(writer, "Population SD = {:.2}", panel.population_std_dev)?;
        writeln!(writer, "{:>12} | Abs(Popn Std. - Sample Std.)", "Sample size")?;

        let max = panel
            .points
            .iter()
            .map(|p| p.mean_abs_diff)
            .fold(0.0, f64::max);
        for point in &panel.points {
            writeln!(
                writer,
                "{:>12} | {} {:.3}",
                point.sample_size,
                Self::bar(point.mean_abs_diff, max),
                point.mean_abs_diff
            )?;
        }
        Ok(())
    }

    fn print_coverage(&self, writer: &mut impl Write, panel: &CoveragePanel) -> io::Result<()> {
        self.print_title(writer, &panel.title)?;
        writeln!(
            writer,
            "Sample size = {}, trials = {}",
            panel.sample_size, panel.trials
        )?;

        let rows = [
            ("sample SD", panel.plug_in_miscoverage),
            ("population SD", panel.known_sd_miscoverage),
        ];
        for (estimate, rate) in rows {
            let value = self.verdict(&format!("{rate:.4}"), PLAUSIBLE_MISCOVERAGE.contains(&rate));
            writeln!(
                writer,
                "Fraction outside {} confidence interval (SE from {}) = {}",
                panel.confidence_label, estimate, value
            )?;
        }
        Ok(())
    }

    fn print_section(&self, writer: &mut impl Write, section: &Section) -> io::Result<()> {
        match section {
            Section::Histogram(panel) => self.print_histogram(writer, panel),
            Section::Values(panel) => self.print_values(writer, panel),
            Section::Series(panel) => self.print_series(writer, panel),
            Section::ErrorBars(panel) => self.print_error_bars(writer, panel),
            Section::Convergence(panel) => self.print_convergence(writer, panel),
            Section::Coverage(panel) => self.print_coverage(writer, panel),
        }
    }

    fn print_report(&self, writer: &mut impl Write, report: &LabReport) -> io::Result<()> {
        writeln!(
            writer,
            "Population of {} runners, seed {}",
            report.population_size, report.seed
        )?;
        for section in &report.sections {
            self.print_section(writer, section)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, report: &LabReport) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.print_report(&mut writer, report)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{ConvergencePoint, SweepPoint};
    use crate::report::{LabelledValue, Series};
    use crate::stats::{Histogram, SummaryStatistic};

    fn render(section: Section) -> String {
        let reporter = TerminalReporter::without_colors();
        let report = LabReport {
            seed: 7,
            population_size: 10,
            sections: vec![section],
        };
        let mut buffer = Vec::new();
        reporter.print_report(&mut buffer, &report).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(TerminalReporter::bar(10.0, 10.0).len(), BAR_WIDTH);
        assert_eq!(TerminalReporter::bar(5.0, 10.0).len(), BAR_WIDTH / 2);
        assert_eq!(TerminalReporter::bar(0.0, 10.0), "");
        assert_eq!(TerminalReporter::bar(1.0, 0.0), "");
    }

    #[test]
    fn test_histogram_annotation() {
        let values = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        let output = render(Section::Histogram(HistogramPanel {
            title: "2012 Boston Marathon".to_string(),
            x_label: "Minutes to Complete Race".to_string(),
            y_label: "Number of Runners".to_string(),
            histogram: Histogram::new(&values, 3).unwrap(),
            summary: SummaryStatistic::of(&values).unwrap(),
            relative: false,
        }));

        assert!(output.contains("Population of 10 runners, seed 7"));
        assert!(output.contains("2012 Boston Marathon"));
        assert!(output.contains("Number of Runners"));
        assert!(output.contains("Mean = 2.33"));
        assert!(output.contains("SD = 0.75"));
        assert!(output.contains(&format!("{} 3", "#".repeat(BAR_WIDTH))));
    }

    #[test]
    fn test_relative_histogram() {
        let values = [0.0, 1.0, 1.0, 1.0];
        let output = render(Section::Histogram(HistogramPanel {
            title: "Rolling Continuous Dice".to_string(),
            x_label: "Value".to_string(),
            y_label: "Probability".to_string(),
            histogram: Histogram::new(&values, 2).unwrap(),
            summary: SummaryStatistic::of(&values).unwrap(),
            relative: true,
        }));

        assert!(output.contains("0.2500"));
        assert!(output.contains("0.7500"));
    }

    #[test]
    fn test_values() {
        let output = render(Section::Values(ValuePanel {
            title: "Effect of variance".to_string(),
            values: vec![LabelledValue {
                label: "Probability of being within 3 of true mean of tight dist.".to_string(),
                value: 0.99730020,
            }],
        }));
        assert!(output
            .contains("Probability of being within 3 of true mean of tight dist. = 0.9973"));
    }

    #[test]
    fn test_series_rows() {
        assert_eq!(TerminalReporter::series_rows(3), vec![0, 1, 2]);
        let rows = TerminalReporter::series_rows(1000);
        assert_eq!(rows.len(), 21);
        assert_eq!(rows[1], 50);
        assert_eq!(rows.last(), Some(&999));
    }

    #[test]
    fn test_series() {
        let output = render(Section::Series(SeriesPanel {
            title: "Sample Means of Size 40".to_string(),
            x_label: "Sample Number".to_string(),
            y_label: "Value of Sample Mean".to_string(),
            series: vec![
                Series {
                    label: "SD = 1".to_string(),
                    values: (0..100).map(|i| f64::from(i) / 100.0).collect(),
                },
                Series {
                    label: "SD = 100".to_string(),
                    values: vec![-12.5, 3.25],
                },
            ],
        }));

        assert!(output.contains("Value of Sample Mean"));
        assert!(output.contains("Sample Number"));
        assert!(output.contains("SD = 100"));
        assert!(output.contains("-12.5000"));
        assert!(output.contains("0.9900"));
        assert!(output.contains("(21 of 100 points shown)"));
    }

    #[test]
    fn test_default_uses_colors() {
        assert!(TerminalReporter::default().use_colors);
    }

    #[test]
    fn test_error_bars() {
        let output = render(Section::ErrorBars(ErrorBarPanel {
            title: "Estimates of Mean Finishing Time".to_string(),
            z: 1.96,
            population_mean: 100.0,
            points: vec![
                SweepPoint {
                    sample_size: 50,
                    mean_of_means: 101.0,
                    std_of_means: 2.0,
                },
                SweepPoint {
                    sample_size: 250,
                    mean_of_means: 110.0,
                    std_of_means: 1.0,
                },
            ],
        }));

        assert!(output.contains("Population mean = 100.00"));
        assert!(output.contains("[97.08, 104.92]"));
        assert!(output.contains("yes"));
        assert!(output.contains("[108.04, 111.96]"));
        assert!(output.contains("no"));
    }

    #[test]
    fn test_convergence() {
        let output = render(Section::Convergence(ConvergencePanel {
            title: "Sample SD vs. Popn SD".to_string(),
            population_std_dev: 40.0,
            points: vec![
                ConvergencePoint {
                    sample_size: 2,
                    mean_abs_diff: 20.0,
                },
                ConvergencePoint {
                    sample_size: 200,
                    mean_abs_diff: 2.0,
                },
            ],
        }));

        assert!(output.contains("Population SD = 40.00"));
        assert!(output.contains("20.000"));
        assert!(output.contains("2.000"));
    }

    #[test]
    fn test_coverage() {
        let output = render(Section::Coverage(CoveragePanel {
            title: "Standard error of the mean".to_string(),
            confidence_label: "95%".to_string(),
            sample_size: 200,
            trials: 10_000,
            plug_in_miscoverage: 0.0512,
            known_sd_miscoverage: 0.0488,
        }));

        assert!(output.contains("Sample size = 200, trials = 10000"));
        assert!(output
            .contains("Fraction outside 95% confidence interval (SE from sample SD) = 0.0512"));
        assert!(output.contains("(SE from population SD) = 0.0488"));
    }
}
