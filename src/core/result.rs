//! Regression result structure.

use faer::Col;

/// Complete result from a regression fit.
///
/// Contains coefficients, fit statistics, and optionally inference statistics
/// (standard errors, t-statistics, p-values, confidence intervals). Weighted
/// fits record the weight vector they were computed with.
#[derive(Debug, Clone)]
pub struct RegressionResult {
    // ========== Core Results ==========
    /// Estimated coefficients (excluding intercept).
    pub coefficients: Col<f64>,

    /// Intercept term (if model was fit with intercept).
    pub intercept: Option<f64>,

    /// Residuals (y - fitted_values).
    pub residuals: Col<f64>,

    /// Fitted values (predictions on training data).
    pub fitted_values: Col<f64>,

    /// Observation weights, when the fit was weighted.
    ///
    /// Length always equals `n_observations`.
    pub weights: Option<Col<f64>>,

    // ========== Dimensions ==========
    /// Number of parameters (including intercept if present).
    pub n_parameters: usize,

    /// Number of observations.
    pub n_observations: usize,

    // ========== Fit Statistics ==========
    /// Coefficient of determination (R²).
    pub r_squared: f64,

    /// Adjusted R².
    pub adj_r_squared: f64,

    /// Mean squared error (RSS / residual df).
    pub mse: f64,

    /// Root mean squared error.
    pub rmse: f64,

    /// F-statistic for overall model significance.
    pub f_statistic: f64,

    /// P-value for F-statistic.
    pub f_pvalue: f64,

    // ========== Information Criteria ==========
    /// Akaike Information Criterion. Lower is better.
    pub aic: f64,

    /// Corrected AIC (for small samples).
    pub aicc: f64,

    /// Bayesian Information Criterion. Lower is better.
    pub bic: f64,

    /// Log-likelihood.
    pub log_likelihood: f64,

    // ========== Inference Statistics (Optional) ==========
    /// Standard errors of coefficients.
    pub std_errors: Option<Col<f64>>,

    /// Standard error of intercept.
    pub intercept_std_error: Option<f64>,

    /// t-statistics for coefficients.
    pub t_statistics: Option<Col<f64>>,

    /// t-statistic for intercept.
    pub intercept_t_statistic: Option<f64>,

    /// P-values for coefficient significance tests.
    pub p_values: Option<Col<f64>>,

    /// P-value for intercept.
    pub intercept_p_value: Option<f64>,

    /// Lower bounds of confidence intervals.
    pub conf_interval_lower: Option<Col<f64>>,

    /// Upper bounds of confidence intervals.
    pub conf_interval_upper: Option<Col<f64>>,

    /// Intercept confidence interval (lower, upper).
    pub intercept_conf_interval: Option<(f64, f64)>,

    /// Confidence level used for intervals.
    pub confidence_level: f64,
}

impl RegressionResult {
    /// Create a new empty result (used internally by solvers).
    pub(crate) fn empty(n_features: usize, n_observations: usize) -> Self {
        Self {
            coefficients: Col::zeros(n_features),
            intercept: None,
            residuals: Col::zeros(n_observations),
            fitted_values: Col::zeros(n_observations),
            weights: None,
            n_parameters: 0,
            n_observations,
            r_squared: 0.0,
            adj_r_squared: 0.0,
            mse: 0.0,
            rmse: 0.0,
            f_statistic: 0.0,
            f_pvalue: 1.0,
            aic: 0.0,
            aicc: 0.0,
            bic: 0.0,
            log_likelihood: 0.0,
            std_errors: None,
            intercept_std_error: None,
            t_statistics: None,
            intercept_t_statistic: None,
            p_values: None,
            intercept_p_value: None,
            conf_interval_lower: None,
            conf_interval_upper: None,
            intercept_conf_interval: None,
            confidence_level: 0.95,
        }
    }

    /// Residual degrees of freedom (n - p).
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Model degrees of freedom (p - 1 if intercept, else p).
    pub fn model_df(&self) -> usize {
        if self.intercept.is_some() {
            self.n_parameters.saturating_sub(1)
        } else {
            self.n_parameters
        }
    }

    /// Residual sum of squares (unweighted).
    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|&r| r * r).sum()
    }

    /// Check if the model has been successfully fit.
    pub fn is_valid(&self) -> bool {
        self.n_parameters > 0 && self.n_observations > self.n_parameters
    }

    /// Format a coefficient table in the style of a printed model summary.
    ///
    /// `labels` names the predictor columns in design-matrix order; the
    /// intercept row is added automatically when present.
    pub fn summary(&self, labels: &[String]) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:<16} {:>12} {:>12} {:>9} {:>10}\n",
            "term", "estimate", "std.error", "t", "p"
        ));

        let fmt_opt = |v: Option<f64>| match v {
            Some(x) if x.is_finite() => format!("{x:>12.4}"),
            _ => format!("{:>12}", "-"),
        };

        if let Some(intercept) = self.intercept {
            out.push_str(&format!(
                "{:<16} {:>12.4} {} {} {}\n",
                "(intercept)",
                intercept,
                fmt_opt(self.intercept_std_error),
                match self.intercept_t_statistic {
                    Some(t) if t.is_finite() => format!("{t:>9.3}"),
                    _ => format!("{:>9}", "-"),
                },
                match self.intercept_p_value {
                    Some(p) if p.is_finite() => format!("{p:>10.4}"),
                    _ => format!("{:>10}", "-"),
                },
            ));
        }

        for (j, label) in labels.iter().enumerate() {
            let se = self.std_errors.as_ref().map(|s| s[j]);
            let t = self.t_statistics.as_ref().map(|s| s[j]);
            let p = self.p_values.as_ref().map(|s| s[j]);
            out.push_str(&format!(
                "{:<16} {:>12.4} {} {} {}\n",
                label,
                self.coefficients[j],
                fmt_opt(se),
                match t {
                    Some(t) if t.is_finite() => format!("{t:>9.3}"),
                    _ => format!("{:>9}", "-"),
                },
                match p {
                    Some(p) if p.is_finite() => format!("{p:>10.4}"),
                    _ => format!("{:>10}", "-"),
                },
            ));
        }

        out.push_str(&format!(
            "R² = {:.4}, adj. R² = {:.4}, AIC = {:.2}, BIC = {:.2}\n",
            self.r_squared, self.adj_r_squared, self.aic, self.bic
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = RegressionResult::empty(3, 10);
        assert_eq!(result.coefficients.nrows(), 3);
        assert_eq!(result.n_observations, 10);
        assert_eq!(result.residual_df(), 10);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_degrees_of_freedom() {
        let mut result = RegressionResult::empty(3, 100);
        result.n_parameters = 4;
        result.intercept = Some(1.0);

        assert_eq!(result.residual_df(), 96);
        assert_eq!(result.model_df(), 3);
        assert!(result.is_valid());
    }

    #[test]
    fn test_rss() {
        let mut result = RegressionResult::empty(1, 3);
        result.residuals = Col::from_fn(3, |i| (i + 1) as f64);
        assert!((result.rss() - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_contains_terms() {
        let mut result = RegressionResult::empty(2, 10);
        result.intercept = Some(1.5);
        result.coefficients[0] = 2.0;
        result.coefficients[1] = -0.5;

        let text = result.summary(&["accept".to_string(), "top25perc".to_string()]);
        assert!(text.contains("(intercept)"));
        assert!(text.contains("accept"));
        assert!(text.contains("top25perc"));
    }
}
