//! Export a fit run to JSON.
//!
//! The export carries everything needed to reproduce the printed report:
//! the fitted line, the observations it was fitted on, and the skipped lines.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::domain::{LogLinearFit, ObservationSeries, TimeUnit};
use crate::error::{AppError, EXIT_IO};
use crate::io::ingest::LineIssue;

/// JSON schema of an exported run.
#[derive(Debug, Serialize)]
pub struct FitExport<'a> {
    pub tool: &'static str,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub time_unit: TimeUnit,
    pub fit: FitSummary,
    pub observations: &'a ObservationSeries,
    pub skipped_lines: &'a [LineIssue],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FitSummary {
    pub rate: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub doubling_time: Option<f64>,
}

impl From<&LogLinearFit> for FitSummary {
    fn from(fit: &LogLinearFit) -> Self {
        Self {
            rate: fit.rate,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            doubling_time: fit.doubling_time(),
        }
    }
}

impl<'a> FitExport<'a> {
    pub fn new(run: &'a RunOutput, source: &Path, time_unit: TimeUnit) -> Self {
        Self {
            tool: "growth",
            generated_at: Utc::now(),
            source: source.display().to_string(),
            time_unit,
            fit: FitSummary::from(&run.fit),
            observations: &run.ingest.series,
            skipped_lines: &run.ingest.issues,
        }
    }
}

/// Write a fit run as pretty-printed JSON.
pub fn write_fit_json(path: &Path, export: &FitExport<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, export)
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
