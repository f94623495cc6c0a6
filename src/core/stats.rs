//! Shared fit-statistic computations used by the solvers.

use crate::core::RegressionResult;
use faer::Col;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Populate a [`RegressionResult`] with fit statistics for an unweighted fit.
///
/// R², adjusted R², MSE, the F test and the information criteria all follow
/// the usual least-squares definitions with `n_params` counted parameters
/// (including the intercept when present).
#[allow(clippy::too_many_arguments)]
pub(crate) fn summarize_fit(
    y: &Col<f64>,
    coefficients: &Col<f64>,
    intercept: Option<f64>,
    residuals: &Col<f64>,
    fitted_values: &Col<f64>,
    n_params: usize,
    confidence_level: f64,
) -> RegressionResult {
    let n = y.nrows();
    let y_mean: f64 = y.iter().sum::<f64>() / n as f64;

    let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let rss: f64 = residuals.iter().map(|&r| r.powi(2)).sum();

    build_result(
        y.nrows(),
        coefficients,
        intercept,
        residuals,
        fitted_values,
        n_params,
        confidence_level,
        tss,
        rss,
    )
}

/// Populate a [`RegressionResult`] for a weighted fit.
///
/// TSS and RSS are weighted, with the weighted mean of `y` as the centering
/// point, so R² matches what a weighted least-squares summary reports.
#[allow(clippy::too_many_arguments)]
pub(crate) fn summarize_weighted_fit(
    y: &Col<f64>,
    weights: &Col<f64>,
    coefficients: &Col<f64>,
    intercept: Option<f64>,
    residuals: &Col<f64>,
    fitted_values: &Col<f64>,
    n_params: usize,
    confidence_level: f64,
) -> RegressionResult {
    let sum_w: f64 = weights.iter().sum();
    let y_mean: f64 = y
        .iter()
        .zip(weights.iter())
        .map(|(&yi, &wi)| wi * yi)
        .sum::<f64>()
        / sum_w;

    let tss: f64 = y
        .iter()
        .zip(weights.iter())
        .map(|(&yi, &wi)| wi * (yi - y_mean).powi(2))
        .sum();
    let rss: f64 = residuals
        .iter()
        .zip(weights.iter())
        .map(|(&ri, &wi)| wi * ri.powi(2))
        .sum();

    let mut result = build_result(
        y.nrows(),
        coefficients,
        intercept,
        residuals,
        fitted_values,
        n_params,
        confidence_level,
        tss,
        rss,
    );
    result.weights = Some(weights.clone());
    result
}

#[allow(clippy::too_many_arguments)]
fn build_result(
    n: usize,
    coefficients: &Col<f64>,
    intercept: Option<f64>,
    residuals: &Col<f64>,
    fitted_values: &Col<f64>,
    n_params: usize,
    confidence_level: f64,
    tss: f64,
    rss: f64,
) -> RegressionResult {
    let r_squared = if tss > 0.0 {
        (1.0 - rss / tss).clamp(0.0, 1.0)
    } else if rss < 1e-10 {
        1.0
    } else {
        0.0
    };

    let df_total = (n - 1) as f64;
    let df_resid = n.saturating_sub(n_params) as f64;
    let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
        1.0 - (1.0 - r_squared) * df_total / df_resid
    } else {
        f64::NAN
    };

    let mse = if df_resid > 0.0 {
        rss / df_resid
    } else {
        f64::NAN
    };
    let rmse = mse.sqrt();

    let ess = tss - rss;
    let df_model = (n_params - usize::from(intercept.is_some())) as f64;
    let f_statistic = if df_model > 0.0 && df_resid > 0.0 && mse > 0.0 {
        (ess / df_model) / mse
    } else {
        f64::NAN
    };

    let f_pvalue = if f_statistic.is_finite() && df_model > 0.0 && df_resid > 0.0 {
        FisherSnedecor::new(df_model, df_resid)
            .ok()
            .map_or(f64::NAN, |d| 1.0 - d.cdf(f_statistic))
    } else {
        f64::NAN
    };

    let log_likelihood = if mse > 0.0 {
        -0.5 * n as f64 * (1.0 + (2.0 * std::f64::consts::PI).ln() + mse.ln())
    } else {
        f64::NAN
    };

    let k = n_params as f64;
    let aic = if log_likelihood.is_finite() {
        2.0 * k - 2.0 * log_likelihood
    } else {
        f64::NAN
    };
    let aicc = if log_likelihood.is_finite() && (n as f64 - k - 1.0) > 0.0 {
        aic + 2.0 * k * (k + 1.0) / (n as f64 - k - 1.0)
    } else {
        f64::NAN
    };
    let bic = if log_likelihood.is_finite() {
        k * (n as f64).ln() - 2.0 * log_likelihood
    } else {
        f64::NAN
    };

    let mut result = RegressionResult::empty(coefficients.nrows(), n);
    result.coefficients = coefficients.clone();
    result.intercept = intercept;
    result.residuals = residuals.clone();
    result.fitted_values = fitted_values.clone();
    result.n_parameters = n_params;
    result.n_observations = n;
    result.r_squared = r_squared;
    result.adj_r_squared = adj_r_squared;
    result.mse = mse;
    result.rmse = rmse;
    result.f_statistic = f_statistic;
    result.f_pvalue = f_pvalue;
    result.aic = aic;
    result.aicc = aicc;
    result.bic = bic;
    result.log_likelihood = log_likelihood;
    result.confidence_level = confidence_level;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_fit_r_squared() {
        let y = Col::from_fn(10, |i| 2.0 + 3.0 * i as f64);
        let fitted = y.clone();
        let residuals = Col::zeros(10);
        let coefficients = Col::from_fn(1, |_| 3.0);

        let result = summarize_fit(&y, &coefficients, Some(2.0), &residuals, &fitted, 2, 0.95);
        assert!((result.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_reduces_to_unweighted_with_unit_weights() {
        let y = Col::from_fn(10, |i| 1.0 + (i as f64) * 0.5 + if i % 2 == 0 { 0.1 } else { -0.1 });
        let fitted = Col::from_fn(10, |i| 1.0 + (i as f64) * 0.5);
        let residuals = Col::from_fn(10, |i| y[i] - fitted[i]);
        let coefficients = Col::from_fn(1, |_| 0.5);
        let weights = Col::from_fn(10, |_| 1.0);

        let plain = summarize_fit(&y, &coefficients, Some(1.0), &residuals, &fitted, 2, 0.95);
        let weighted = summarize_weighted_fit(
            &y,
            &weights,
            &coefficients,
            Some(1.0),
            &residuals,
            &fitted,
            2,
            0.95,
        );

        assert!((plain.r_squared - weighted.r_squared).abs() < 1e-12);
        assert!((plain.aic - weighted.aic).abs() < 1e-10);
    }
}
