//! Reporting utilities: residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{LogLinearFit, Observation, ObservationSeries};

/// One observation next to its fitted value, in log2 space.
#[derive(Debug, Clone, Copy)]
pub struct Residual {
    pub observation: Observation,
    pub log2_obs: f64,
    pub log2_fit: f64,
    pub residual: f64,
}

/// Compare every observation with the fitted line.
pub fn compute_residuals(series: &ObservationSeries, fit: &LogLinearFit) -> Vec<Residual> {
    series
        .iter()
        .map(|obs| {
            let log2_obs = obs.log2_concentration();
            let log2_fit = fit.predict_log2(obs.time());
            Residual {
                observation: *obs,
                log2_obs,
                log2_fit,
                residual: log2_obs - log2_fit,
            }
        })
        .collect()
}
