//! Loading marathon results.
//!
//! The input is comma-separated text with one runner per line and six fields
//! in fixed order: name, gender, age, division, country, finishing time in
//! minutes. There is no header row.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Number of comma-separated fields in every record.
const FIELD_COUNT: usize = 6;

/// Errors that can occur while loading runner data.
#[derive(Debug, Error)]
pub enum DataError {
    /// The data file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line could not be parsed into a record.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// The file contained no records.
    #[error("No runner records found")]
    Empty,
}

/// One runner's finishing record.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerRecord {
    pub name: String,
    pub gender: String,
    pub age: u32,
    pub division: u32,
    pub country: String,
    /// Overall finishing time in minutes.
    pub time_minutes: f64,
}

impl RunnerRecord {
    /// Parse a single line. `line_number` is 1-based and only used in errors.
    pub fn parse(line: &str, line_number: usize) -> Result<Self, DataError> {
        let malformed = |reason: String| DataError::MalformedRow {
            line: line_number,
            reason,
        };

        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if fields.len() != FIELD_COUNT {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            )));
        }
        let fields: Vec<&str> = fields.iter().map(|f| f.trim()).collect();

        let age = fields[2]
            .parse()
            .map_err(|e| malformed(format!("invalid age {:?}: {}", fields[2], e)))?;
        let division = fields[3]
            .parse()
            .map_err(|e| malformed(format!("invalid division {:?}: {}", fields[3], e)))?;
        let time_minutes: f64 = fields[5]
            .parse()
            .map_err(|e| malformed(format!("invalid time {:?}: {}", fields[5], e)))?;
        if !time_minutes.is_finite() {
            return Err(malformed(format!("time {time_minutes} is not finite")));
        }

        Ok(Self {
            name: fields[0].to_string(),
            gender: fields[1].to_string(),
            age,
            division,
            country: fields[4].to_string(),
            time_minutes,
        })
    }
}

/// Parse every non-blank line of `content` into records.
///
/// With `skip_malformed`, rows that fail to parse are logged and dropped;
/// otherwise the first bad row aborts the load.
///
/// # Errors
///
/// Returns [`DataError::MalformedRow`] for a bad row (unless skipping) and
/// [`DataError::Empty`] if no records remain.
pub fn parse_records(content: &str, skip_malformed: bool) -> Result<Vec<RunnerRecord>, DataError> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match RunnerRecord::parse(line, idx + 1) {
            Ok(record) => records.push(record),
            Err(e) if skip_malformed => {
                warn!("Skipping row: {}", e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed rows", skipped);
    }
    if records.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(records)
}

/// Read and parse a runner data file.
///
/// # Errors
///
/// Returns [`DataError::Io`] if the file cannot be read, otherwise the errors
/// of [`parse_records`].
pub fn load_records(path: &Path, skip_malformed: bool) -> Result<Vec<RunnerRecord>, DataError> {
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&content, skip_malformed)?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Finishing times of all runners, in file order.
pub fn finishing_times(records: &[RunnerRecord]) -> Vec<f64> {
    records.iter().map(|r| r.time_minutes).collect()
}
