//! Box-Cox and Box-Tidwell transform selection.

mod common;

use approx::assert_relative_eq;
use collegefit::prelude::*;
use common::TestRng;
use faer::{Col, Mat};

/// Multiplicative-error data: the log scale is the right one.
fn multiplicative_data() -> (Mat<f64>, Col<f64>) {
    let mut rng = TestRng::new(42);
    let n = 200;
    let mut xs = vec![0.0; n];
    for v in xs.iter_mut() {
        *v = 5.0 * rng.next();
    }
    let mut ys = vec![0.0; n];
    for (i, v) in ys.iter_mut().enumerate() {
        *v = (0.5 + 0.4 * xs[i] + 0.3 * rng.next()).exp();
    }
    let x = Mat::from_fn(n, 1, |i, _| xs[i]);
    let y = Col::from_fn(n, |i| ys[i]);
    (x, y)
}

#[test]
fn test_boxcox_recovers_log_scale() {
    let (x, y) = multiplicative_data();
    let fit = boxcox_search(&x, &y).unwrap();

    assert!(fit.lambda.abs() < 0.1, "lambda {}", fit.lambda);
    assert!(fit.is_log());
}

#[test]
fn test_transform_stabilizes_variance() {
    let (x, y) = multiplicative_data();

    let raw = OlsRegressor::builder().build().fit(&x, &y).unwrap();
    let bp_raw = breusch_pagan(&raw.result().residuals, &raw.result().fitted_values).unwrap();
    assert!(!bp_raw.is_adequate(0.05));
    assert_relative_eq!(bp_raw.lm_statistic, 17.04, epsilon = 0.05);

    let fit = boxcox_search(&x, &y).unwrap();
    let y_log = boxcox_apply(&y, fit.lambda).unwrap();
    let logged = OlsRegressor::builder().build().fit(&x, &y_log).unwrap();
    let bp_log =
        breusch_pagan(&logged.result().residuals, &logged.result().fitted_values).unwrap();
    assert!(bp_log.is_adequate(0.05));
    assert_relative_eq!(bp_log.p_value, 0.1753, epsilon = 1e-3);
}

#[test]
fn test_boxcox_on_college_is_a_power_not_a_log() {
    let data = College::load().unwrap();
    let spec = ModelSpec::all_predictors(&data, College::RESPONSE);
    let (x, y, _) = spec.design(&data).unwrap();

    let fit = boxcox_search(&x, &y).unwrap();
    assert_relative_eq!(fit.lambda, 0.85, epsilon = 1e-6);
    assert!(!fit.is_log());
}

#[test]
fn test_boxcox_rejects_non_positive_response() {
    let x = Mat::from_fn(10, 1, |i, _| i as f64);
    let y = Col::from_fn(10, |i| i as f64 - 3.0);

    assert!(matches!(
        boxcox_search(&x, &y),
        Err(TransformError::NonPositiveValues)
    ));
}

#[test]
fn test_box_tidwell_exponent_for_accept_is_near_one() {
    let data = College::load().unwrap();
    let spec = ModelSpec::all_predictors(&data, College::RESPONSE);
    let (x, y, labels) = spec.design(&data).unwrap();
    let accept = labels.iter().position(|l| l == "accept").unwrap();

    let alpha = box_tidwell(&x, &y, accept).unwrap();
    assert_relative_eq!(alpha, 1.037, epsilon = 0.01);
}

#[test]
fn test_box_tidwell_rejects_non_positive_column() {
    let data = College::load().unwrap();
    let spec = ModelSpec::all_predictors(&data, College::RESPONSE);
    let (x, y, labels) = spec.design(&data).unwrap();
    // the 0/1 categorical column contains zeros
    let private = labels.iter().position(|l| l == "private").unwrap();

    assert!(matches!(
        box_tidwell(&x, &y, private),
        Err(TransformError::NonPositiveValues)
    ));
}
