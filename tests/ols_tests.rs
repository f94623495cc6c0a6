//! Baseline OLS behavior on the bundled college dataset.

mod common;

use approx::assert_relative_eq;
use collegefit::prelude::*;
use common::TestRng;
use faer::Mat;

#[test]
fn test_two_predictor_college_fit() {
    let data = College::load().unwrap();
    let spec = ModelSpec::response("apps")
        .with_main("accept")
        .with_main("top25perc");
    let (x, y, labels) = spec.design(&data).unwrap();
    assert_eq!(labels, vec!["accept", "top25perc"]);

    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
    let result = fitted.result();

    assert_relative_eq!(result.intercept.unwrap(), -2.20490, max_relative = 1e-3);
    assert_relative_eq!(result.coefficients[0], 1.68499, max_relative = 1e-4);
    assert_relative_eq!(result.coefficients[1], 7.59207, max_relative = 1e-4);
    assert_relative_eq!(result.adj_r_squared, 0.96818, epsilon = 1e-4);
    assert_relative_eq!(result.aic, 12712.06, epsilon = 0.1);
}

#[test]
fn test_residuals_orthogonal_to_design() {
    let data = College::load().unwrap();
    let spec = ModelSpec::response("apps")
        .with_main("accept")
        .with_main("top25perc");
    let (x, y, _) = spec.design(&data).unwrap();

    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
    let residuals = &fitted.result().residuals;

    let resid_sum: f64 = residuals.iter().sum();
    assert!(resid_sum.abs() < 1e-5, "residual sum {resid_sum}");

    for j in 0..x.ncols() {
        let dot: f64 = (0..x.nrows()).map(|i| residuals[i] * x[(i, j)]).sum();
        // scaled by the column magnitude
        let norm: f64 = (0..x.nrows()).map(|i| x[(i, j)].powi(2)).sum::<f64>().sqrt();
        assert!(dot.abs() / norm < 1e-6, "column {j} dot {dot}");
    }
}

#[test]
fn test_noise_column_worsens_aic() {
    let data = College::load().unwrap();
    let spec = ModelSpec::response("apps")
        .with_main("accept")
        .with_main("top25perc");
    let (x, y, _) = spec.design(&data).unwrap();
    let n = x.nrows();

    let base = OlsRegressor::builder().build().fit(&x, &y).unwrap();

    let mut rng = TestRng::new(7);
    let mut noise = vec![0.0; n];
    for v in noise.iter_mut() {
        *v = rng.next();
    }
    let padded = Mat::from_fn(n, 3, |i, j| if j < 2 { x[(i, j)] } else { noise[i] });
    let with_noise = OlsRegressor::builder().build().fit(&padded, &y).unwrap();

    // an uninformative column costs about the 2-unit parameter penalty
    let delta = with_noise.result().aic - base.result().aic;
    assert!(delta > 0.0, "AIC should worsen, delta {delta}");
    assert_relative_eq!(delta, 1.278, epsilon = 0.05);
}

#[test]
fn test_prediction_matches_fitted_values() {
    let data = College::load().unwrap();
    let spec = ModelSpec::response("apps").with_main("accept");
    let (x, y, _) = spec.design(&data).unwrap();

    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
    let predictions = fitted.predict(&x);

    for i in 0..x.nrows() {
        assert_relative_eq!(predictions[i], fitted.result().fitted_values[i], epsilon = 1e-8);
    }
}
