//! Coefficient inference calculations.

use crate::core::RegressionResult;
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Attach standard errors, t-statistics, p-values, and confidence
    /// intervals to an unweighted fit.
    ///
    /// When the cross-product matrix is singular the inference fields are
    /// simply left unset; the point estimates remain valid.
    pub fn attach(x: &Mat<f64>, result: &mut RegressionResult, confidence_level: f64) {
        Self::attach_weighted_impl(x, None, result, confidence_level);
    }

    /// Attach inference statistics to a weighted fit, using (X'WX)⁻¹.
    pub fn attach_weighted(
        x: &Mat<f64>,
        weights: &Col<f64>,
        result: &mut RegressionResult,
        confidence_level: f64,
    ) {
        Self::attach_weighted_impl(x, Some(weights), result, confidence_level);
    }

    fn attach_weighted_impl(
        x: &Mat<f64>,
        weights: Option<&Col<f64>>,
        result: &mut RegressionResult,
        confidence_level: f64,
    ) {
        let df = result.residual_df() as f64;
        if df <= 0.0 || !result.mse.is_finite() {
            return;
        }

        let has_intercept = result.intercept.is_some();
        let Some(inv) = Self::cross_product_inverse(x, weights, has_intercept) else {
            return;
        };

        let n_features = x.ncols();
        let offset = usize::from(has_intercept);

        let std_errors = Col::from_fn(n_features, |j| {
            let var = result.mse * inv[(j + offset, j + offset)];
            if var >= 0.0 {
                var.sqrt()
            } else {
                f64::NAN
            }
        });

        let t_stats = Self::t_statistics(&result.coefficients, &std_errors);
        let p_vals = Self::p_values(&t_stats, df);
        let (ci_lower, ci_upper) =
            Self::confidence_intervals(&result.coefficients, &std_errors, df, confidence_level);

        result.std_errors = Some(std_errors);
        result.t_statistics = Some(t_stats);
        result.p_values = Some(p_vals);
        result.conf_interval_lower = Some(ci_lower);
        result.conf_interval_upper = Some(ci_upper);

        if let Some(intercept) = result.intercept {
            let var_int = result.mse * inv[(0, 0)];
            let se_int = if var_int >= 0.0 {
                var_int.sqrt()
            } else {
                f64::NAN
            };

            let t_int = if se_int > 0.0 {
                intercept / se_int
            } else {
                f64::NAN
            };

            let t_dist = StudentsT::new(0.0, 1.0, df).ok();
            let p_int = if t_int.is_finite() {
                t_dist
                    .as_ref()
                    .map_or(f64::NAN, |d| 2.0 * (1.0 - d.cdf(t_int.abs())))
            } else {
                f64::NAN
            };
            let t_crit = t_dist.as_ref().map_or(f64::NAN, |d| {
                d.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0)
            });

            result.intercept_std_error = Some(se_int);
            result.intercept_t_statistic = Some(t_int);
            result.intercept_p_value = Some(p_int);
            result.intercept_conf_interval =
                Some((intercept - t_crit * se_int, intercept + t_crit * se_int));
        }
    }

    /// Compute t-statistics: t_j = β_j / SE(β_j).
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// Two-tailed p-values from t-statistics with `df` degrees of freedom.
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        let n = t_statistics.nrows();
        if df <= 0.0 {
            return Col::from_fn(n, |_| f64::NAN);
        }

        let t_dist = StudentsT::new(0.0, 1.0, df).expect("valid t-distribution parameters");
        Col::from_fn(n, |j| {
            if t_statistics[j].is_nan() {
                f64::NAN
            } else {
                2.0 * (1.0 - t_dist.cdf(t_statistics[j].abs()))
            }
        })
    }

    /// Confidence intervals: β_j ± t_{α/2, df} · SE(β_j).
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let n = coefficients.nrows();
        if df <= 0.0 {
            return (
                Col::from_fn(n, |_| f64::NAN),
                Col::from_fn(n, |_| f64::NAN),
            );
        }

        let t_dist = StudentsT::new(0.0, 1.0, df).expect("valid t-distribution parameters");
        let alpha = 1.0 - confidence_level;
        let t_crit = t_dist.inverse_cdf(1.0 - alpha / 2.0);

        let lower = Col::from_fn(n, |j| {
            if std_errors[j].is_nan() {
                f64::NAN
            } else {
                coefficients[j] - t_crit * std_errors[j]
            }
        });
        let upper = Col::from_fn(n, |j| {
            if std_errors[j].is_nan() {
                f64::NAN
            } else {
                coefficients[j] + t_crit * std_errors[j]
            }
        });
        (lower, upper)
    }

    /// Inverse of the (possibly weighted, possibly intercept-augmented)
    /// cross-product matrix, or `None` when singular.
    fn cross_product_inverse(
        x: &Mat<f64>,
        weights: Option<&Col<f64>>,
        with_intercept: bool,
    ) -> Option<Mat<f64>> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        let size = n_features + usize::from(with_intercept);

        let design_value = |i: usize, j: usize| -> f64 {
            if with_intercept {
                if j == 0 {
                    1.0
                } else {
                    x[(i, j - 1)]
                }
            } else {
                x[(i, j)]
            }
        };

        let mut xtx: Mat<f64> = Mat::zeros(size, size);
        for i in 0..n_samples {
            let w = weights.map_or(1.0, |w| w[i]);
            for j in 0..size {
                let dj = design_value(i, j);
                for k in 0..size {
                    xtx[(j, k)] += w * dj * design_value(i, k);
                }
            }
        }

        // Invert via QR and back-substitution
        let qr = xtx.qr();
        let q = qr.compute_Q();
        let r = qr.R();

        for i in 0..size {
            if r[(i, i)].abs() < 1e-10 {
                return None;
            }
        }

        let qt = q.transpose();
        let mut inv: Mat<f64> = Mat::zeros(size, size);
        for col in 0..size {
            for i in (0..size).rev() {
                let mut sum = qt[(i, col)];
                for j in (i + 1)..size {
                    sum -= r[(i, j)] * inv[(j, col)];
                }
                inv[(i, col)] = sum / r[(i, i)];
            }
        }

        Some(inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_statistics() {
        let coefficients = Col::from_fn(3, |i| (i + 1) as f64);
        let std_errors = Col::from_fn(3, |_| 0.5);

        let t_stats = CoefficientInference::t_statistics(&coefficients, &std_errors);

        assert!((t_stats[0] - 2.0).abs() < 1e-10);
        assert!((t_stats[1] - 4.0).abs() < 1e-10);
        assert!((t_stats[2] - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_p_values_bounds() {
        let t_stats = Col::from_fn(3, |i| (i + 1) as f64);
        let p_vals = CoefficientInference::p_values(&t_stats, 10.0);

        for p in p_vals.iter() {
            assert!(*p >= 0.0 && *p <= 1.0);
        }
    }

    #[test]
    fn test_confidence_interval_contains_estimate() {
        let coefficients = Col::from_fn(2, |i| (i as f64) - 0.5);
        let std_errors = Col::from_fn(2, |_| 0.25);

        let (lower, upper) =
            CoefficientInference::confidence_intervals(&coefficients, &std_errors, 20.0, 0.95);

        for j in 0..2 {
            assert!(lower[j] < coefficients[j]);
            assert!(upper[j] > coefficients[j]);
        }
    }
}
