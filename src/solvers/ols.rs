//! Ordinary Least Squares regression solver.

use crate::core::stats::summarize_fit;
use crate::core::{RegressionOptions, RegressionOptionsBuilder, RegressionResult};
use crate::inference::CoefficientInference;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_columns, center_vector, detect_constant_columns};
use faer::{Col, Mat};

/// Ordinary Least Squares regression estimator.
///
/// Uses QR decomposition with column pivoting. Rank-deficient designs are
/// rejected with [`RegressionError::SingularFit`] rather than patched up.
///
/// # Example
///
/// ```rust,ignore
/// use collegefit::solvers::{OlsRegressor, Regressor, FittedRegressor};
/// use faer::{Mat, Col};
///
/// let fitted = OlsRegressor::builder()
///     .with_intercept(true)
///     .build()
///     .fit(&x, &y)?;
///
/// println!("adj. R² = {}", fitted.result().adj_r_squared);
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }

        if n_samples < 2 {
            return Err(RegressionError::InsufficientObservations {
                needed: 2,
                got: n_samples,
            });
        }

        let n_params = if self.options.with_intercept {
            n_features + 1
        } else {
            n_features
        };
        if n_samples < n_params {
            return Err(RegressionError::InsufficientObservations {
                needed: n_params,
                got: n_samples,
            });
        }

        // A constant column is collinear with the intercept.
        if self.options.with_intercept {
            let constant_cols = detect_constant_columns(x, self.options.rank_tolerance);
            if constant_cols.iter().any(|&c| c) {
                return Err(RegressionError::SingularFit);
            }
        }

        let (coefficients, intercept, fitted_values, residuals) = if self.options.with_intercept {
            let (x_centered, x_means) = center_columns(x);
            let (y_centered, y_mean) = center_vector(y);

            let coefficients =
                solve_with_qr(&x_centered, &y_centered, self.options.rank_tolerance)?;

            let mut intercept = y_mean;
            for j in 0..n_features {
                intercept -= x_means[j] * coefficients[j];
            }

            let fitted_values = Col::from_fn(n_samples, |i| {
                let mut pred = intercept;
                for j in 0..n_features {
                    pred += x[(i, j)] * coefficients[j];
                }
                pred
            });
            let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

            (coefficients, Some(intercept), fitted_values, residuals)
        } else {
            let coefficients = solve_with_qr(x, y, self.options.rank_tolerance)?;

            let fitted_values = Col::from_fn(n_samples, |i| {
                let mut pred = 0.0;
                for j in 0..n_features {
                    pred += x[(i, j)] * coefficients[j];
                }
                pred
            });
            let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

            (coefficients, None, fitted_values, residuals)
        };

        let mut result = summarize_fit(
            y,
            &coefficients,
            intercept,
            &residuals,
            &fitted_values,
            n_params,
            self.options.confidence_level,
        );

        if self.options.compute_inference {
            CoefficientInference::attach(x, &mut result, self.options.confidence_level);
        }

        Ok(FittedOls {
            options: self.options.clone(),
            result,
        })
    }
}

/// Solve the least squares problem via column-pivoted QR.
///
/// Fails with `SingularFit` when the numerical rank is below the column
/// count.
pub(crate) fn solve_with_qr(
    x: &Mat<f64>,
    y: &Col<f64>,
    rank_tolerance: f64,
) -> Result<Col<f64>, RegressionError> {
    let n_features = x.ncols();
    let n_samples = x.nrows();

    let qr = x.col_piv_qr();
    let q = qr.compute_Q();
    let r = qr.R();
    let perm = qr.P();

    // Numerical rank from the R diagonal
    let mut rank = 0;
    for i in 0..n_features.min(n_samples) {
        if r[(i, i)].abs() > rank_tolerance {
            rank += 1;
        } else {
            break;
        }
    }
    if rank < n_features {
        return Err(RegressionError::SingularFit);
    }

    // Back-substitution for the upper triangular system R * beta_perm = Q'y
    let qty = q.transpose() * y;
    let mut beta_perm = Col::zeros(rank);
    for i in (0..rank).rev() {
        let mut sum = qty[i];
        for j in (i + 1)..rank {
            sum -= r[(i, j)] * beta_perm[j];
        }
        beta_perm[i] = sum / r[(i, i)];
    }

    // Unpermute: position i of the pivoted solution belongs to the column
    // the forward permutation names (equivalently, beta[j] gathers
    // beta_perm through the inverse permutation).
    let mut beta = Col::zeros(n_features);
    for i in 0..n_features {
        beta[perm.arrays().0[i]] = beta_perm[i];
    }

    Ok(beta)
}

/// A fitted OLS regression model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl FittedRegressor for FittedOls {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        let intercept = self.result.intercept.unwrap_or(0.0);

        Col::from_fn(n_samples, |i| {
            let mut pred = intercept;
            for j in 0..n_features {
                pred += x[(i, j)] * self.result.coefficients[j];
            }
            pred
        })
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Build the OLS regressor.
    pub fn build(self) -> OlsRegressor {
        OlsRegressor::new(self.builder.build_unchecked())
    }
}
