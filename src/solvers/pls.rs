//! Partial Least Squares regression via the SIMPLS algorithm.
//!
//! Useful as a cross-check on heavily collinear predictor sets (enrollment
//! counts track acceptance counts closely): the latent components stay
//! well-conditioned where a plain OLS design would be near-singular.
//!
//! Reference: de Jong, S. (1993). SIMPLS: an alternative approach to partial
//! least squares regression. Chemometrics and Intelligent Laboratory
//! Systems, 18, 251-263.

use crate::core::stats::summarize_fit;
use crate::core::RegressionResult;
use crate::solvers::ols::solve_with_qr;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_columns, center_vector};
use faer::{Col, Mat};

/// Partial Least Squares regression estimator.
///
/// Extracts up to `n_components` latent directions maximizing the covariance
/// between X scores and y, then regresses y on those scores.
#[derive(Debug, Clone)]
pub struct PlsRegressor {
    n_components: usize,
    with_intercept: bool,
    tolerance: f64,
}

impl PlsRegressor {
    /// Create a new PLS regressor with the given number of components.
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            with_intercept: true,
            tolerance: 1e-10,
        }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> PlsRegressorBuilder {
        PlsRegressorBuilder::default()
    }

    /// SIMPLS on centered data.
    ///
    /// Returns (W, P, q, T, number of components actually extracted). The
    /// weights are scaled so that T = X·W with unit-norm score columns.
    #[allow(clippy::type_complexity)]
    fn simpls(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        ncomp: usize,
    ) -> (Mat<f64>, Mat<f64>, Col<f64>, Mat<f64>, usize) {
        let n = x.nrows();
        let p = x.ncols();

        let mut weights: Mat<f64> = Mat::zeros(p, ncomp);
        let mut x_loadings: Mat<f64> = Mat::zeros(p, ncomp);
        let mut y_loadings: Col<f64> = Col::zeros(ncomp);
        let mut scores: Mat<f64> = Mat::zeros(n, ncomp);
        // Orthonormal basis used to deflate the cross-product
        let mut basis: Mat<f64> = Mat::zeros(p, ncomp);

        let mut s: Col<f64> = x.transpose() * y;
        let mut extracted = 0;

        for a in 0..ncomp {
            // Project s away from the span of earlier loadings
            let mut r = s.clone();
            for k in 0..a {
                let proj: f64 = (0..p).map(|j| basis[(j, k)] * r[j]).sum();
                for j in 0..p {
                    r[j] -= basis[(j, k)] * proj;
                }
            }

            let r_norm = r.norm_l2();
            if r_norm < self.tolerance {
                break;
            }

            let w: Col<f64> = Col::from_fn(p, |j| r[j] / r_norm);
            let t: Col<f64> = x * &w;
            let t_norm = t.norm_l2();
            if t_norm < self.tolerance {
                break;
            }

            for i in 0..n {
                scores[(i, a)] = t[i] / t_norm;
            }
            for j in 0..p {
                weights[(j, a)] = w[j] / t_norm;
            }

            let mut q = 0.0;
            for i in 0..n {
                q += y[i] * scores[(i, a)];
            }
            y_loadings[a] = q;

            let loading: Col<f64> = x.transpose() * Col::from_fn(n, |i| scores[(i, a)]);
            for j in 0..p {
                x_loadings[(j, a)] = loading[j];
                basis[(j, a)] = loading[j];
            }

            // Gram-Schmidt the new basis vector and deflate s
            for k in 0..a {
                let proj: f64 = (0..p).map(|j| basis[(j, k)] * basis[(j, a)]).sum();
                for j in 0..p {
                    basis[(j, a)] -= basis[(j, k)] * proj;
                }
            }
            let b_norm: f64 = (0..p).map(|j| basis[(j, a)].powi(2)).sum::<f64>().sqrt();
            if b_norm > self.tolerance {
                for j in 0..p {
                    basis[(j, a)] /= b_norm;
                }
            }
            let proj: f64 = (0..p).map(|j| basis[(j, a)] * s[j]).sum();
            for j in 0..p {
                s[j] -= basis[(j, a)] * proj;
            }

            extracted = a + 1;
        }

        (weights, x_loadings, y_loadings, scores, extracted)
    }
}

impl Regressor for PlsRegressor {
    type Fitted = FittedPls;

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

        let requested = self.n_components.min(n_samples).min(n_features);
        if requested == 0 {
            return Err(RegressionError::InsufficientObservations { needed: 1, got: 0 });
        }

        let (x_centered, x_means) = center_columns(x);
        let (y_centered, y_mean) = center_vector(y);

        let (weights, x_loadings, y_loadings, scores, ncomp) =
            self.simpls(&x_centered, &y_centered, requested);
        if ncomp == 0 {
            return Err(RegressionError::SingularFit);
        }

        // B = W (P'W)^{-1} q, restricted to the extracted components
        let mut ptw: Mat<f64> = Mat::zeros(ncomp, ncomp);
        for i in 0..ncomp {
            for j in 0..ncomp {
                let mut sum = 0.0;
                for k in 0..n_features {
                    sum += x_loadings[(k, i)] * weights[(k, j)];
                }
                ptw[(i, j)] = sum;
            }
        }
        let q_used = Col::from_fn(ncomp, |a| y_loadings[a]);
        let c = solve_with_qr(&ptw, &q_used, self.tolerance)?;

        let coefficients = Col::from_fn(n_features, |j| {
            let mut sum = 0.0;
            for k in 0..ncomp {
                sum += weights[(j, k)] * c[k];
            }
            sum
        });

        let intercept = if self.with_intercept {
            let mut int = y_mean;
            for j in 0..n_features {
                int -= x_means[j] * coefficients[j];
            }
            Some(int)
        } else {
            None
        };

        let fitted_values = Col::from_fn(n_samples, |i| {
            let mut pred = intercept.unwrap_or(0.0);
            for j in 0..n_features {
                pred += x[(i, j)] * coefficients[j];
            }
            pred
        });
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        // Parameter count follows the latent dimension, not the raw columns
        let n_params = ncomp + usize::from(intercept.is_some());
        let result = summarize_fit(
            y,
            &coefficients,
            intercept,
            &residuals,
            &fitted_values,
            n_params,
            0.95,
        );

        Ok(FittedPls {
            n_components: ncomp,
            result,
            x_means,
            weights,
            x_loadings,
            y_loadings,
            scores,
        })
    }
}

/// A fitted PLS regression model.
#[derive(Debug, Clone)]
pub struct FittedPls {
    n_components: usize,
    result: RegressionResult,
    x_means: Col<f64>,
    weights: Mat<f64>,
    x_loadings: Mat<f64>,
    y_loadings: Col<f64>,
    scores: Mat<f64>,
}

impl FittedPls {
    /// Number of latent components actually extracted.
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Weight matrix W (p × n_components).
    pub fn weights(&self) -> &Mat<f64> {
        &self.weights
    }

    /// X-loadings matrix P (p × n_components).
    pub fn x_loadings(&self) -> &Mat<f64> {
        &self.x_loadings
    }

    /// Y-loadings vector q.
    pub fn y_loadings(&self) -> &Col<f64> {
        &self.y_loadings
    }

    /// Training score matrix T (n × n_components).
    pub fn scores(&self) -> &Mat<f64> {
        &self.scores
    }

    /// Compute latent scores for new data.
    pub fn transform(&self, x: &Mat<f64>) -> Mat<f64> {
        let n = x.nrows();
        let p = x.ncols();
        Mat::from_fn(n, self.n_components, |i, k| {
            let mut sum = 0.0;
            for j in 0..p {
                sum += (x[(i, j)] - self.x_means[j]) * self.weights[(j, k)];
            }
            sum
        })
    }
}

impl FittedRegressor for FittedPls {
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

/// Builder for `PlsRegressor`.
#[derive(Debug, Clone)]
pub struct PlsRegressorBuilder {
    n_components: usize,
    with_intercept: bool,
    tolerance: f64,
}

impl Default for PlsRegressorBuilder {
    fn default() -> Self {
        Self {
            n_components: 2,
            with_intercept: true,
            tolerance: 1e-10,
        }
    }
}

impl PlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of latent components (clamped to min(n, p) at fit time).
    pub fn n_components(mut self, n: usize) -> Self {
        self.n_components = n;
        self
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.with_intercept = include;
        self
    }

    /// Set the numerical tolerance.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Build the PLS regressor.
    pub fn build(self) -> PlsRegressor {
        PlsRegressor {
            n_components: self.n_components,
            with_intercept: self.with_intercept,
            tolerance: self.tolerance,
        }
    }
}
