//! Robust regression with Huber weights, fit by iteratively reweighted
//! least squares.

use crate::core::{RegressionOptions, RegressionOptionsBuilder, RegressionResult};
use crate::solvers::ols::OlsRegressor;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::solvers::wls::WlsRegressor;
use crate::utils::median_absolute;
use faer::{Col, Mat};

/// Default Huber tuning constant, 95% efficiency under Gaussian errors.
pub const HUBER_K: f64 = 1.345;

/// Consistency factor relating the MAD to the Gaussian standard deviation.
const MAD_CONSISTENCY: f64 = 0.6745;

/// Robust regression estimator using the Huber loss.
///
/// Observations with residuals inside `k` scale units get full weight;
/// beyond that the weight decays as k·s/|e|, so outliers pull the fit far
/// less than under squared loss. Fitting runs IRLS from an OLS start and
/// stops when no coefficient moves by more than the tolerance.
#[derive(Debug, Clone)]
pub struct HuberRegressor {
    options: RegressionOptions,
    k: f64,
}

impl HuberRegressor {
    /// Create a new Huber regressor with the given options and the default
    /// tuning constant.
    pub fn new(options: RegressionOptions) -> Self {
        Self {
            options,
            k: HUBER_K,
        }
    }

    /// Override the tuning constant.
    pub fn with_tuning_constant(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> HuberRegressorBuilder {
        HuberRegressorBuilder::default()
    }

    fn robust_scale(residuals: &Col<f64>) -> f64 {
        median_absolute(residuals) / MAD_CONSISTENCY
    }

    fn huber_weights(residuals: &Col<f64>, threshold: f64) -> Col<f64> {
        Col::from_fn(residuals.nrows(), |i| {
            let abs_r = residuals[i].abs();
            if abs_r <= threshold {
                1.0
            } else {
                threshold / abs_r
            }
        })
    }
}

impl Regressor for HuberRegressor {
    type Fitted = FittedHuber;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        let n_features = x.ncols();

        // OLS start. Dimension and rank problems surface here.
        let initial = OlsRegressor::new(self.options.clone()).fit(x, y)?;
        let mut result = initial.result().clone();

        for iteration in 1..=self.options.max_iterations {
            let scale = Self::robust_scale(&result.residuals);
            if scale < 1e-12 {
                // Essentially exact fit; nothing to downweight.
                return Ok(FittedHuber {
                    options: self.options.clone(),
                    result,
                    iterations: iteration - 1,
                    converged: true,
                });
            }

            let weights = Self::huber_weights(&result.residuals, self.k * scale);
            let refit = WlsRegressor::new(self.options.clone())
                .with_weights(weights)
                .fit(x, y)?;
            let new_result = refit.result().clone();

            let mut max_change: f64 = 0.0;
            for j in 0..n_features {
                let change = (new_result.coefficients[j] - result.coefficients[j]).abs();
                max_change = max_change.max(change);
            }
            if let (Some(new_int), Some(old_int)) = (new_result.intercept, result.intercept) {
                max_change = max_change.max((new_int - old_int).abs());
            }

            result = new_result;

            if max_change < self.options.tolerance {
                return Ok(FittedHuber {
                    options: self.options.clone(),
                    result,
                    iterations: iteration,
                    converged: true,
                });
            }
        }

        Err(RegressionError::NonConvergence {
            iterations: self.options.max_iterations,
        })
    }
}

/// A fitted Huber regression model.
#[derive(Debug, Clone)]
pub struct FittedHuber {
    options: RegressionOptions,
    result: RegressionResult,
    iterations: usize,
    converged: bool,
}

impl FittedHuber {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Number of IRLS iterations performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the IRLS loop converged (always true for a returned fit).
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Final Huber weights from the last reweighting step.
    pub fn robust_weights(&self) -> Option<&Col<f64>> {
        self.result.weights.as_ref()
    }
}

impl FittedRegressor for FittedHuber {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let intercept = self.result.intercept.unwrap_or(0.0);
        Col::from_fn(x.nrows(), |i| {
            let mut pred = intercept;
            for j in 0..x.ncols() {
                pred += x[(i, j)] * self.result.coefficients[j];
            }
            pred
        })
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }
}

/// Builder for `HuberRegressor`.
#[derive(Debug, Clone)]
pub struct HuberRegressorBuilder {
    builder: RegressionOptionsBuilder,
    k: f64,
}

impl Default for HuberRegressorBuilder {
    fn default() -> Self {
        Self {
            builder: RegressionOptionsBuilder::default(),
            k: HUBER_K,
        }
    }
}

impl HuberRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Huber tuning constant.
    pub fn tuning_constant(mut self, k: f64) -> Self {
        self.k = k;
        self
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

    /// Set the maximum number of IRLS iterations.
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.builder = self.builder.max_iterations(max);
        self
    }

    /// Set the convergence tolerance on coefficient changes.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.tolerance(tol);
        self
    }

    /// Build the Huber regressor.
    pub fn build(self) -> HuberRegressor {
        HuberRegressor::new(self.builder.build_unchecked()).with_tuning_constant(self.k)
    }
}
