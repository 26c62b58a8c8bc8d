use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use super::{LabReport, ReportError, Reporter};

/// Writes the computed series as pretty-printed JSON for external plotting.
#[derive(Debug, Clone)]
pub struct JsonReporter {
    path: PathBuf,
}

impl JsonReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_to(writer: &mut impl Write, report: &LabReport) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for JsonReporter {
    fn report(&self, report: &LabReport) -> Result<(), ReportError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        Self::write_to(&mut writer, report)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{LabelledValue, Section, Series, SeriesPanel, ValuePanel};

    fn sample_report() -> LabReport {
        LabReport {
            seed: 42,
            population_size: 3,
            sections: vec![Section::Values(ValuePanel {
                title: "Dice".to_string(),
                values: vec![LabelledValue {
                    label: "Mean of rolling 1 die".to_string(),
                    value: 2.5,
                }],
            })],
        }
    }

    #[test]
    fn test_write_to_buffer() {
        let mut buffer = Vec::new();
        JsonReporter::write_to(&mut buffer, &sample_report()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["seed"], 42);
        assert_eq!(value["sections"][0]["kind"], "values");
        assert_eq!(value["sections"][0]["values"][0]["value"], 2.5);
    }

    #[test]
    fn test_series_exported_in_full() {
        let report = LabReport {
            seed: 1,
            population_size: 0,
            sections: vec![Section::Series(SeriesPanel {
                title: "Sample Means of Size 40".to_string(),
                x_label: "Sample Number".to_string(),
                y_label: "Value of Sample Mean".to_string(),
                series: vec![Series {
                    label: "SD = 1".to_string(),
                    values: vec![0.25, -0.5, 0.125],
                }],
            })],
        };
        let mut buffer = Vec::new();
        JsonReporter::write_to(&mut buffer, &report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let section = &value["sections"][0];
        assert_eq!(section["kind"], "series");
        assert_eq!(section["series"][0]["label"], "SD = 1");
        assert_eq!(
            section["series"][0]["values"],
            serde_json::json!([0.25, -0.5, 0.125])
        );
    }

    #[test]
    fn test_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        JsonReporter::new(&path).report(&sample_report()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"population_size\": 3"));
    }

    #[test]
    fn test_report_to_missing_directory_fails() {
        let reporter = JsonReporter::new("/nonexistent/dir/report.json");
        assert!(matches!(
            reporter.report(&sample_report()),
            Err(ReportError::Io(_))
        ));
    }
}
