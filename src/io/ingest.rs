//! Delimited-text ingest.
//!
//! This module turns a two-column text file into an [`ObservationSeries`].
//!
//! Format:
//! - one `time, concentration` pair per line
//! - fields separated by commas, tabs, or spaces (tabs and spaces are treated
//!   as commas; runs of separators collapse)
//! - blank lines and lines starting with `#` are skipped
//! - extra fields after the second are ignored
//!
//! Design goals:
//! - **Line-level tolerance** for malformed lines (skip, but report what happened)
//! - **Hard stop** on values that are numbers but out of range, since that
//!   usually means the columns are swapped or the file is not growth data
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::domain::{Observation, ObservationSeries};
use crate::error::{AppError, EXIT_DATA, EXIT_IO};

/// Shown alongside load problems.
pub const FILE_FORMAT_INSTRUCTIONS: &str = "\
The file must contain two columns: Time (Column 1) and Concentration (Column 2).
Data must be separated by commas, tabs, or spaces.
Time must be >= 0. Concentration must be > 0 (for log calculation).
Example format:
0, 0.1
1.5, 0.25
";

/// Why a line was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineIssueKind {
    /// Fewer than two fields.
    MissingData,
    /// A field could not be parsed as a number.
    NotANumber,
}

/// A skipped line.
#[derive(Debug, Clone, Serialize)]
pub struct LineIssue {
    /// 1-based line number.
    pub line: usize,
    pub kind: LineIssueKind,
    pub message: String,
}

/// Ingest output: the loaded series plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub series: ObservationSeries,
    pub issues: Vec<LineIssue>,
    pub lines_read: usize,
}

/// Load observations from a file on disk.
pub fn load_observations(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to open '{}': {e}", path.display())))?;

    let data = parse_observations(BufReader::new(file))?;
    log::info!(
        "loaded {} observation(s) from '{}' ({} line(s), {} skipped)",
        data.series.len(),
        path.display(),
        data.lines_read,
        data.issues.len()
    );
    Ok(data)
}

/// Parse observations from any buffered reader.
pub fn parse_observations<R: BufRead>(reader: R) -> Result<IngestedData, AppError> {
    let mut points = Vec::new();
    let mut issues = Vec::new();
    let mut lines_read = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        lines_read += 1;

        let line = line.map_err(|e| AppError::new(EXIT_IO, format!("Line {line_num}: failed to read: {e}")))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields = split_fields(line);
        if fields.len() < 2 {
            let issue = LineIssue {
                line: line_num,
                kind: LineIssueKind::MissingData,
                message: format!("Line {line_num}: Missing data (Time, Concentration)."),
            };
            log::warn!("{}", issue.message);
            issues.push(issue);
            continue;
        }

        let (time, concentration) = match (fields[0].parse::<f64>(), fields[1].parse::<f64>()) {
            (Ok(t), Ok(c)) => (t, c),
            _ => {
                let issue = LineIssue {
                    line: line_num,
                    kind: LineIssueKind::NotANumber,
                    message: format!("Line {line_num}: Data must be valid numbers."),
                };
                log::warn!("{}", issue.message);
                issues.push(issue);
                continue;
            }
        };

        let obs = Observation::new(time, concentration).map_err(|_| {
            AppError::new(
                EXIT_DATA,
                format!(
                    "Line {line_num}: Time must be non-negative (>=0) and Concentration must be positive (>0).\n\n{FILE_FORMAT_INSTRUCTIONS}"
                ),
            )
        })?;
        points.push(obs);
    }

    if points.is_empty() {
        return Err(AppError::new(
            EXIT_DATA,
            format!("The file did not contain valid data points.\n\n{FILE_FORMAT_INSTRUCTIONS}"),
        ));
    }

    Ok(IngestedData {
        series: ObservationSeries::from_observations(points),
        issues,
        lines_read,
    })
}

/// Split a data line on commas, tabs, and spaces, dropping empty fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split([',', '\t', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
