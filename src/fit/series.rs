//! Multi-point growth rate via log2-linear regression.
//!
//! Each concentration is transformed to `log2(c)` and regressed against time:
//!
//! ```text
//! log2(c) = k * t + b
//! ```
//!
//! The slope `k` is the specific growth rate (generations per unit time) and
//! `R²` is the coefficient of determination of that line. The regression is
//! order-independent; callers may pass the series in any order.

use super::GrowthError;
use crate::domain::{FitResult, LogLinearFit, ObservationSeries};
use crate::math::fit_line;

/// Fit the growth rate of a series, returning `(rate, r_squared)`.
pub fn fit_rate(times: &[f64], concentrations: &[f64]) -> Result<FitResult, GrowthError> {
    fit_log_linear(times, concentrations).map(|fit| fit.result())
}

/// Same validation and regression as [`fit_rate`], also keeping the intercept
/// so callers can draw the fitted line.
///
/// Checks run in a fixed order and the first failure is reported:
///
/// 1. at least two points (neither sequence reaches two: insufficient data)
/// 2. equal lengths
/// 3. every concentration finite and `> 0`
/// 4. every time finite and `>= 0`
pub fn fit_log_linear(times: &[f64], concentrations: &[f64]) -> Result<LogLinearFit, GrowthError> {
    // A pair like `[1, 2]` vs `[10]` is a length mismatch, not a shortage.
    let found = times.len().max(concentrations.len());
    if found < 2 {
        return Err(GrowthError::InsufficientData { found });
    }
    if times.len() != concentrations.len() {
        return Err(GrowthError::LengthMismatch {
            times: times.len(),
            concentrations: concentrations.len(),
        });
    }
    if !concentrations.iter().all(|&c| is_valid_concentration(c)) {
        return Err(GrowthError::invalid("All concentration points must be positive."));
    }
    if !times.iter().all(|&t| is_valid_time(t)) {
        return Err(GrowthError::invalid("All time points must be non-negative."));
    }

    let log2_c: Vec<f64> = concentrations.iter().map(|c| c.log2()).collect();

    // Constant log2 values: flat line, perfect fit. Handled before the
    // regression so we never divide by a zero total sum of squares.
    let first = log2_c[0];
    if log2_c.iter().all(|&y| y == first) {
        return Ok(LogLinearFit {
            rate: 0.0,
            intercept: first,
            r_squared: 1.0,
        });
    }

    let t0 = times[0];
    if times.iter().all(|&t| t == t0) {
        return Err(GrowthError::invalid("Time points must not all be identical."));
    }

    let line = fit_line(times, &log2_c)
        .ok_or_else(|| GrowthError::invalid("Time and concentration points do not determine a line."))?;

    let r_squared = (1.0 - line.sse / line.sst).clamp(0.0, 1.0);

    Ok(LogLinearFit {
        rate: line.slope,
        intercept: line.intercept,
        r_squared,
    })
}

/// Fit a caller-owned observation series.
pub fn fit_series(series: &ObservationSeries) -> Result<LogLinearFit, GrowthError> {
    fit_log_linear(&series.times(), &series.concentrations())
}

/// Reject anything that can't be stored as an observation.
///
/// Time must be finite and `>= 0`; concentration finite and `> 0`.
pub fn validate_observation(time: f64, concentration: f64) -> Result<(), GrowthError> {
    if is_valid_time(time) && is_valid_concentration(concentration) {
        Ok(())
    } else {
        Err(GrowthError::invalid(
            "Time must be non-negative (>=0) and Concentration must be positive (>0).",
        ))
    }
}

fn is_valid_time(t: f64) -> bool {
    t.is_finite() && t >= 0.0
}

fn is_valid_concentration(c: f64) -> bool {
    c.is_finite() && c > 0.0
}
