//! Box-Cox response transform selected by profile log-likelihood.

use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
use crate::transform::TransformError;
use faer::{Col, Mat};

/// Below this |λ| the transform is taken as the log limiting case.
const LOG_LAMBDA_EPS: f64 = 0.1;

/// Grid bounds and resolution for the λ search.
const LAMBDA_MIN: f64 = -2.0;
const LAMBDA_MAX: f64 = 2.0;
const LAMBDA_STEP: f64 = 0.05;

/// Selected Box-Cox exponent and its profile log-likelihood.
#[derive(Debug, Clone, Copy)]
pub struct BoxCoxFit {
    pub lambda: f64,
    pub log_likelihood: f64,
}

impl BoxCoxFit {
    /// Whether the selected exponent collapses to the log transform.
    pub fn is_log(&self) -> bool {
        self.lambda.abs() < LOG_LAMBDA_EPS
    }
}

/// Grid-search the Box-Cox exponent for `y` regressed on `x`.
///
/// For each λ in [−2, 2] (step 0.05) the response is transformed with
/// (y^λ − 1)/λ (ln y at λ = 0), refit by OLS, and scored with the profile
/// log-likelihood −n/2·ln(RSS(λ)/n) + (λ − 1)·Σ ln y. Returns the maximizer.
pub fn boxcox_search(x: &Mat<f64>, y: &Col<f64>) -> Result<BoxCoxFit, TransformError> {
    if y.iter().any(|&v| v <= 0.0) {
        return Err(TransformError::NonPositiveValues);
    }

    let n = y.nrows();
    let sum_log_y: f64 = y.iter().map(|&v| v.ln()).sum();

    let model = OlsRegressor::builder()
        .with_intercept(true)
        .compute_inference(false)
        .build();

    let steps = ((LAMBDA_MAX - LAMBDA_MIN) / LAMBDA_STEP).round() as i64;
    let mut best: Option<BoxCoxFit> = None;

    for k in 0..=steps {
        let lambda = LAMBDA_MIN + k as f64 * LAMBDA_STEP;

        let transformed = if lambda.abs() < 1e-9 {
            Col::from_fn(n, |i| y[i].ln())
        } else {
            Col::from_fn(n, |i| (y[i].powf(lambda) - 1.0) / lambda)
        };

        let fitted = model.fit(x, &transformed)?;
        let rss = fitted.result().rss();
        if rss <= 0.0 {
            continue;
        }

        let log_likelihood =
            -0.5 * n as f64 * (rss / n as f64).ln() + (lambda - 1.0) * sum_log_y;

        let better = match &best {
            Some(b) => log_likelihood > b.log_likelihood,
            None => true,
        };
        if better {
            best = Some(BoxCoxFit {
                lambda,
                log_likelihood,
            });
        }
    }

    best.ok_or(TransformError::Fit(
        crate::solvers::RegressionError::SingularFit,
    ))
}

/// Apply the selected transform: ln(y) when |λ| < 0.1, plain y^λ otherwise.
pub fn boxcox_apply(y: &Col<f64>, lambda: f64) -> Result<Col<f64>, TransformError> {
    if y.iter().any(|&v| v <= 0.0) {
        return Err(TransformError::NonPositiveValues);
    }

    let n = y.nrows();
    if lambda.abs() < LOG_LAMBDA_EPS {
        Ok(Col::from_fn(n, |i| y[i].ln()))
    } else {
        Ok(Col::from_fn(n, |i| y[i].powf(lambda)))
    }
}
