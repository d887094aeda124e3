//! Single-point specific growth rate.
//!
//! ```text
//! k = (log2(N_t) - log2(N_0)) / t
//! ```

use super::GrowthError;

const ALL_POSITIVE: &str =
    "All parameters (final density, initial density, elapsed time) must be positive.";

/// Specific growth rate in generations per unit time.
///
/// Fails with [`GrowthError::InvalidParameter`] if any argument is not a
/// finite, strictly positive number. The message does not say which one.
pub fn compute_rate(final_density: f64, initial_density: f64, elapsed_time: f64) -> Result<f64, GrowthError> {
    if !is_positive(elapsed_time) || !is_positive(final_density) || !is_positive(initial_density) {
        return Err(GrowthError::invalid(ALL_POSITIVE));
    }
    Ok((final_density.log2() - initial_density.log2()) / elapsed_time)
}

/// Number of doublings between two densities.
pub fn generations(final_density: f64, initial_density: f64) -> Result<f64, GrowthError> {
    if !is_positive(final_density) || !is_positive(initial_density) {
        return Err(GrowthError::invalid(ALL_POSITIVE));
    }
    Ok(final_density.log2() - initial_density.log2())
}

/// Check a single value against the positivity rule used by [`compute_rate`].
///
/// `what` names the value in the error message.
pub fn require_positive(value: f64, what: &str) -> Result<f64, GrowthError> {
    if is_positive(value) {
        Ok(value)
    } else {
        Err(GrowthError::invalid(format!("{what} must be greater than zero.")))
    }
}

// NaN fails every comparison, so `> 0.0` already rejects it.
fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
