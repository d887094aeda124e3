//! Shared "fit pipeline" logic used by both the CLI and the TUI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load file -> validate lines -> log2-linear fit
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;

use crate::domain::{LogLinearFit, ObservationSeries};
use crate::error::AppError;
use crate::io::ingest::{load_observations, IngestedData};

/// All computed outputs of a single `growth fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub fit: LogLinearFit,
}

/// Load a data file and fit it.
pub fn run_fit(path: &Path) -> Result<RunOutput, AppError> {
    let ingest = load_observations(path)?;
    let fit = fit_observations(&ingest.series)?;
    Ok(RunOutput { ingest, fit })
}

/// Fit an in-memory series (the TUI refits after every edit).
pub fn fit_observations(series: &ObservationSeries) -> Result<LogLinearFit, AppError> {
    let fit = crate::fit::fit_series(series)?;
    log::debug!(
        "fitted {} point(s): k={:.6} intercept={:.6} r2={:.6}",
        series.len(),
        fit.rate,
        fit.intercept,
        fit.r_squared
    );
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EXIT_DATA, EXIT_INVALID_INPUT};

    fn temp_file(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("growth_pipeline_{}_{name}", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn run_fit_loads_and_fits() {
        let path = temp_file("ok.csv", "0 10\n1 14.5\n2 21\n3 30\n4 43\n");
        let run = run_fit(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(run.ingest.series.len(), 5);
        assert!(run.fit.rate > 0.5 && run.fit.rate < 0.6);
        assert!(run.fit.r_squared > 0.99);
    }

    #[test]
    fn single_observation_is_a_fit_error() {
        let path = temp_file("one.csv", "0,10\n");
        let err = run_fit(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);
    }

    #[test]
    fn aborted_load_is_a_data_error() {
        let path = temp_file("bad.csv", "0,10\n1,0\n");
        let err = run_fit(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), EXIT_DATA);
    }
}
