use thiserror::Error;

/// Validation failures raised by the growth-rate routines.
///
/// Every variant is a deterministic function of the input, so retrying with
/// the same arguments will fail the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    /// A numeric input violates a positivity or non-negativity rule.
    #[error("Error: {0}")]
    InvalidParameter(String),

    /// Fewer than two observations were supplied to the fitter.
    #[error("Error: at least two data points (time and concentration) are required for fitting (got {found}).")]
    InsufficientData { found: usize },

    /// Time and concentration sequences differ in length.
    #[error(
        "Error: time and concentration lists must have the same length (got {times} times, {concentrations} concentrations)."
    )]
    LengthMismatch { times: usize, concentrations: usize },
}

impl GrowthError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}
