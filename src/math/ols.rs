//! Ordinary least squares.
//!
//! The growth fitter solves one tiny regression per call:
//!
//! ```text
//! minimize Σ (y_i - (β0 + β1 u_i))^2,   u_i = (x_i - x̄) / s,   s = max |x_i - x̄|
//! ```
//!
//! Implementation choices:
//! - The abscissa is centred on its mean and scaled into `[-1, 1]` before
//!   building the design matrix, so both columns have comparable norms no
//!   matter how small or large the time stamps are. The slope is `β1 / s`;
//!   the intercept is shifted back to `x = 0`.
//! - We solve with SVD, which handles the tall (n × 2) design matrix directly.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)

use nalgebra::{DMatrix, DVector};

/// Singular values below this fraction of the largest one are treated as zero.
const RELATIVE_SVD_TOLERANCE: f64 = 1e-12;

/// Solve a least squares problem using SVD.
///
/// The rank cut-off is relative to the largest singular value, so a uniformly
/// tiny (or huge) design is solved the same as a unit-scaled one. Returns
/// `None` for an all-zero design or a non-finite solution.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    let sigma_max = svd.singular_values.max();
    if !(sigma_max.is_finite() && sigma_max > 0.0) {
        return None;
    }

    let beta = svd.solve(y, RELATIVE_SVD_TOLERANCE * sigma_max).ok()?;
    beta.iter().all(|v| v.is_finite()).then_some(beta)
}

/// Straight-line fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Residual sum of squares.
    pub sse: f64,
    /// Total sum of squares of `y` about its mean.
    pub sst: f64,
}

/// Fit a straight line through `(x_i, y_i)`.
///
/// The slices must have the same, non-zero length and `x` must not be
/// constant; callers validate that before getting here. Returns `None` if
/// the solve fails anyway.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LineFit> {
    let n = x.len();
    if n == 0 || n != y.len() {
        return None;
    }

    let x_mean = mean(x);
    let y_mean = mean(y);

    let scale = x.iter().map(|&xi| (xi - x_mean).abs()).fold(0.0, f64::max);
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }
    let u: Vec<f64> = x.iter().map(|&xi| (xi - x_mean) / scale).collect();

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { u[i] });
    let rhs = DVector::from_column_slice(y);
    let beta = solve_least_squares(&design, &rhs)?;

    let slope = beta[1] / scale;
    let intercept = beta[0] - slope * x_mean;

    // Residuals in the scaled coordinates: `slope * x_i` can lose every
    // significant digit when the time stamps are large.
    let mut sse = 0.0;
    let mut sst = 0.0;
    for (&ui, &yi) in u.iter().zip(y) {
        let r = yi - (beta[0] + beta[1] * ui);
        sse += r * r;
        sst += (yi - y_mean) * (yi - y_mean);
    }

    Some(LineFit { slope, intercept, sse, sst })
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}
