//! Weighted Least Squares solver.

use crate::core::stats::summarize_weighted_fit;
use crate::core::{RegressionOptions, RegressionOptionsBuilder, RegressionResult};
use crate::inference::CoefficientInference;
use crate::solvers::ols::{solve_with_qr, OlsRegressor};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use faer::{Col, Mat};

/// Weighted Least Squares regression estimator.
///
/// Minimizes Σ w_i (y_i − x_i'β)², equivalent to OLS on W^(1/2)X, W^(1/2)y.
/// This is the single-pass refitter used to downweight influential
/// observations instead of deleting them: weights come from a prior
/// influence analysis (see `diagnostics::influence_weights`) and stay fixed.
///
/// With all weights equal the fit reduces exactly to OLS.
#[derive(Debug, Clone)]
pub struct WlsRegressor {
    options: RegressionOptions,
    weights: Option<Col<f64>>,
}

impl WlsRegressor {
    /// Create a new WLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self {
            options,
            weights: None,
        }
    }

    /// Set the observation weights.
    pub fn with_weights(mut self, weights: Col<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> WlsRegressorBuilder {
        WlsRegressorBuilder::default()
    }
}

impl Regressor for WlsRegressor {
    type Fitted = FittedWls;

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

        let weights = match &self.weights {
            Some(w) => {
                if w.nrows() != n_samples {
                    return Err(RegressionError::DimensionMismatch {
                        x_rows: n_samples,
                        y_len: w.nrows(),
                    });
                }
                if w.iter().any(|&wi| wi < 0.0 || !wi.is_finite()) {
                    return Err(RegressionError::InvalidWeights);
                }
                w.clone()
            }
            None => Col::from_fn(n_samples, |_| 1.0),
        };

        let weight_sum: f64 = weights.iter().sum();
        if weight_sum < 1e-14 {
            return Err(RegressionError::InvalidWeights);
        }

        // Effective observations are those with non-zero weight
        let n_effective = weights.iter().filter(|&&w| w > 1e-14).count();
        let n_params = if self.options.with_intercept {
            n_features + 1
        } else {
            n_features
        };
        if n_effective < n_params {
            return Err(RegressionError::InsufficientObservations {
                needed: n_params,
                got: n_effective,
            });
        }

        // Uniform positive weights: delegate to OLS, which yields identical
        // coefficients.
        let first_weight = weights[0];
        let all_equal = weights.iter().all(|&w| (w - first_weight).abs() < 1e-14);
        if all_equal && first_weight > 0.0 {
            let ols_fitted = OlsRegressor::new(self.options.clone()).fit(x, y)?;
            let mut result = ols_fitted.result().clone();
            result.weights = Some(weights);
            return Ok(FittedWls {
                options: self.options.clone(),
                result,
            });
        }

        let (coefficients, intercept) = if self.options.with_intercept {
            let (x_cw, y_cw, x_means, y_mean) = weighted_center(x, y, &weights);
            let coefficients = solve_with_qr(&x_cw, &y_cw, self.options.rank_tolerance)?;

            let mut intercept = y_mean;
            for j in 0..n_features {
                intercept -= x_means[j] * coefficients[j];
            }
            (coefficients, Some(intercept))
        } else {
            let mut x_weighted = Mat::zeros(n_samples, n_features);
            let mut y_weighted = Col::zeros(n_samples);
            for i in 0..n_samples {
                let sw = weights[i].sqrt();
                y_weighted[i] = y[i] * sw;
                for j in 0..n_features {
                    x_weighted[(i, j)] = x[(i, j)] * sw;
                }
            }
            let coefficients =
                solve_with_qr(&x_weighted, &y_weighted, self.options.rank_tolerance)?;
            (coefficients, None)
        };

        // Fitted values and residuals live in the original (unweighted) space
        let fitted_values = Col::from_fn(n_samples, |i| {
            let mut pred = intercept.unwrap_or(0.0);
            for j in 0..n_features {
                pred += x[(i, j)] * coefficients[j];
            }
            pred
        });
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        let mut result = summarize_weighted_fit(
            y,
            &weights,
            &coefficients,
            intercept,
            &residuals,
            &fitted_values,
            n_params,
            self.options.confidence_level,
        );

        if self.options.compute_inference {
            CoefficientInference::attach_weighted(
                x,
                &weights,
                &mut result,
                self.options.confidence_level,
            );
        }

        Ok(FittedWls {
            options: self.options.clone(),
            result,
        })
    }
}

/// Weighted centering: subtract weighted means, then scale rows by sqrt(w).
fn weighted_center(
    x: &Mat<f64>,
    y: &Col<f64>,
    weights: &Col<f64>,
) -> (Mat<f64>, Col<f64>, Col<f64>, f64) {
    let n_samples = x.nrows();
    let n_features = x.ncols();
    let sum_w: f64 = weights.iter().sum();

    let mut x_means = Col::zeros(n_features);
    for j in 0..n_features {
        let mut sum = 0.0;
        for i in 0..n_samples {
            sum += weights[i] * x[(i, j)];
        }
        x_means[j] = sum / sum_w;
    }

    let y_mean: f64 = y
        .iter()
        .zip(weights.iter())
        .map(|(&yi, &wi)| wi * yi)
        .sum::<f64>()
        / sum_w;

    let mut x_cw = Mat::zeros(n_samples, n_features);
    let mut y_cw = Col::zeros(n_samples);
    for i in 0..n_samples {
        let sw = weights[i].sqrt();
        y_cw[i] = sw * (y[i] - y_mean);
        for j in 0..n_features {
            x_cw[(i, j)] = sw * (x[(i, j)] - x_means[j]);
        }
    }

    (x_cw, y_cw, x_means, y_mean)
}

/// A fitted WLS regression model.
#[derive(Debug, Clone)]
pub struct FittedWls {
    options: RegressionOptions,
    result: RegressionResult,
}

impl FittedWls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// The weight vector this model was fit with.
    pub fn weights(&self) -> Option<&Col<f64>> {
        self.result.weights.as_ref()
    }
}

impl FittedRegressor for FittedWls {
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

/// Builder for `WlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct WlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
    weights: Option<Col<f64>>,
}

impl WlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the observation weights.
    pub fn weights(mut self, weights: Col<f64>) -> Self {
        self.weights = Some(weights);
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

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Build the WLS regressor.
    pub fn build(self) -> WlsRegressor {
        let mut model = WlsRegressor::new(self.builder.build_unchecked());
        if let Some(w) = self.weights {
            model = model.with_weights(w);
        }
        model
    }
}
