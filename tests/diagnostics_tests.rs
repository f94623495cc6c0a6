//! Influence, leverage, multicollinearity, and heteroskedasticity
//! diagnostics on the bundled college dataset.

use approx::assert_relative_eq;
use collegefit::prelude::*;

fn full_model() -> (faer::Mat<f64>, faer::Col<f64>, Vec<String>, RegressionResult) {
    let data = College::load().unwrap();
    let spec = ModelSpec::all_predictors(&data, College::RESPONSE);
    let (x, y, labels) = spec.design(&data).unwrap();
    let fitted = OlsRegressor::builder().build().fit(&x, &y).unwrap();
    let result = fitted.result().clone();
    (x, y, labels, result)
}

#[test]
fn test_leverage_sums_to_parameter_count() {
    let (x, _, _, _) = full_model();
    let leverage = compute_leverage(&x, true);

    let total: f64 = leverage.iter().sum();
    assert_relative_eq!(total, 18.0, epsilon = 1e-6);
    for h in leverage.iter() {
        assert!((0.0..=1.0).contains(h));
    }
}

#[test]
fn test_cooks_distance_flags_influential_colleges() {
    let (x, _, _, result) = full_model();
    let leverage = compute_leverage(&x, true);
    let cooks = cooks_distance(&result.residuals, &leverage, result.mse, result.n_parameters);

    for d in cooks.iter() {
        assert!(d.is_finite() && *d >= 0.0);
    }

    // default 4/n cutoff
    let flagged = influential_cooks(&cooks, None);
    assert_eq!(flagged.len(), 38);
}

#[test]
fn test_influence_weights_cap_at_one() {
    let (x, _, _, result) = full_model();
    let leverage = compute_leverage(&x, true);
    let cooks = cooks_distance(&result.residuals, &leverage, result.mse, result.n_parameters);

    let weights = influence_weights(&cooks, None);
    let flagged = influential_cooks(&cooks, None);
    for (i, w) in weights.iter().enumerate() {
        assert!(*w > 0.0 && *w <= 1.0);
        if flagged.contains(&i) {
            assert!(*w < 1.0, "flagged row {i} should be downweighted");
        } else {
            assert_relative_eq!(*w, 1.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_vif_identifies_enrollment_cluster() {
    let (x, _, labels, _) = full_model();
    let vif = variance_inflation_factor(&x);

    let idx = |name: &str| labels.iter().position(|l| l == name).unwrap();
    assert_relative_eq!(vif[idx("enroll")], 93.76, epsilon = 0.5);
    assert_relative_eq!(vif[idx("f_undergrad")], 89.89, epsilon = 0.5);
    assert_relative_eq!(vif[idx("accept")], 9.43, epsilon = 0.1);
    assert!(vif[idx("top25perc")] < 10.0);
}

#[test]
fn test_vif_pruning_drops_enrollment_cluster() {
    let (x, y, labels, _) = full_model();
    let kept = prune_by_vif(&x, &y, 5.0);

    let kept_names: Vec<&str> = kept.iter().map(|&j| labels[j].as_str()).collect();
    assert!(!kept_names.contains(&"enroll"));
    assert!(!kept_names.contains(&"f_undergrad"));
    assert!(kept_names.contains(&"accept"));
    assert_eq!(kept.len(), 15);
}

#[test]
fn test_breusch_pagan_rejects_on_college_data() {
    let (_, _, _, result) = full_model();
    let test = breusch_pagan(&result.residuals, &result.fitted_values).unwrap();

    assert_relative_eq!(test.lm_statistic, 118.26, epsilon = 0.1);
    assert!(test.p_value < 1e-20);
    assert!(!test.is_adequate(0.05));
}

#[test]
fn test_studentized_residuals_flag_a_handful() {
    let (x, _, _, result) = full_model();
    let leverage = compute_leverage(&x, true);
    let studentized = studentized_residuals(&result.residuals, &leverage, result.mse);

    // a handful of unusual institutions, not a systematic failure
    let extreme = residual_outliers(&studentized, 3.0);
    assert_eq!(extreme.len(), 15);

    let standardized = standardized_residuals(&result.residuals, result.mse);
    let loose = standardized.iter().filter(|r| r.abs() > 3.0).count();
    assert_eq!(loose, 14);
}
