//! Box-Tidwell predictor-power estimation.

use crate::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
use crate::transform::TransformError;
use faer::{Col, Mat};

const MAX_ITERATIONS: usize = 50;
const TOLERANCE: f64 = 1e-8;

/// Estimate the power exponent that linearizes predictor `column`.
///
/// Each round fits the model with x^α in place of the raw column, then
/// refits with an added x^α·ln(x) term; the ratio of the added coefficient
/// to the base coefficient updates α. The update is half-step damped, which
/// tames the oscillation the raw recursion shows on noisy data.
///
/// The caller keeps the raw column in the model and adds a power term with
/// the returned exponent; this function only estimates α.
pub fn box_tidwell(x: &Mat<f64>, y: &Col<f64>, column: usize) -> Result<f64, TransformError> {
    let n = x.nrows();
    let p = x.ncols();

    if column >= p {
        return Err(TransformError::Fit(RegressionError::DimensionMismatch {
            x_rows: p,
            y_len: column,
        }));
    }
    if (0..n).any(|i| x[(i, column)] <= 0.0) {
        return Err(TransformError::NonPositiveValues);
    }

    let model = OlsRegressor::builder()
        .with_intercept(true)
        .compute_inference(false)
        .build();

    let mut alpha: f64 = 1.0;

    for _ in 0..MAX_ITERATIONS {
        // Base design with the candidate power in place of the raw column
        let base = Mat::from_fn(n, p, |i, j| {
            if j == column {
                x[(i, column)].powf(alpha)
            } else {
                x[(i, j)]
            }
        });
        let base_fit = model.fit(&base, y)?;
        let beta = base_fit.coefficients()[column];
        if beta.abs() < 1e-12 {
            return Err(TransformError::Fit(RegressionError::NonConvergence {
                iterations: MAX_ITERATIONS,
            }));
        }

        // Augmented design with the x^α·ln(x) correction term appended
        let augmented = Mat::from_fn(n, p + 1, |i, j| {
            if j < p {
                base[(i, j)]
            } else {
                base[(i, column)] * x[(i, column)].ln()
            }
        });
        let aug_fit = model.fit(&augmented, y)?;
        let gamma = aug_fit.coefficients()[p];

        let raw = alpha * (gamma / beta + 1.0);
        let next = 0.5 * (alpha + raw);
        let step = (next - alpha).abs();
        alpha = next;

        if step < TOLERANCE {
            return Ok(alpha);
        }
    }

    Err(TransformError::Fit(RegressionError::NonConvergence {
        iterations: MAX_ITERATIONS,
    }))
}
