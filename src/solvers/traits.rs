//! Core traits for regression estimators.

use crate::core::RegressionResult;
use faer::{Col, Mat};
use thiserror::Error;

/// Errors that can occur during regression fitting.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    DimensionMismatch { x_rows: usize, y_len: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    /// The predictor matrix is rank-deficient (perfectly collinear or
    /// constant columns). Surfaced to the caller, never repaired silently.
    #[error("singular fit: predictor matrix is rank-deficient")]
    SingularFit,

    /// An iteratively reweighted fit did not stabilize. Retrying with a
    /// relaxed tolerance or higher iteration budget is up to the caller.
    #[error("no convergence after {iterations} iterations")]
    NonConvergence { iterations: usize },

    #[error("invalid weights: all weights must be non-negative and not all zero")]
    InvalidWeights,

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] crate::core::OptionsError),
}

/// A regression estimator that can be fit to data.
///
/// Fitting returns a separate fitted-model value; estimators are cheap,
/// reusable configuration.
pub trait Regressor {
    /// The type of the fitted model.
    type Fitted: FittedRegressor;

    /// Fit the model to the data.
    ///
    /// # Arguments
    /// * `x` - Design matrix of shape (n_samples, n_features)
    /// * `y` - Response vector of length n_samples
    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted regression model.
pub trait FittedRegressor {
    /// Predict responses for new data.
    fn predict(&self, x: &Mat<f64>) -> Col<f64>;

    /// Access the regression result (coefficients, statistics, etc.).
    fn result(&self) -> &RegressionResult;

    /// Coefficients (excluding intercept).
    fn coefficients(&self) -> &Col<f64> {
        &self.result().coefficients
    }

    /// Intercept, when the model includes one.
    fn intercept(&self) -> Option<f64> {
        self.result().intercept
    }

    /// R² on the training data.
    fn r_squared(&self) -> f64 {
        self.result().r_squared
    }

    /// R² on new data.
    fn score(&self, x: &Mat<f64>, y: &Col<f64>) -> f64 {
        let predictions = self.predict(x);
        let n = y.nrows();

        let y_mean: f64 = y.iter().sum::<f64>() / n as f64;
        let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
        let rss: f64 = y
            .iter()
            .zip(predictions.iter())
            .map(|(&yi, &pi)| (yi - pi).powi(2))
            .sum();

        if tss == 0.0 {
            if rss == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - rss / tss
        }
    }
}
