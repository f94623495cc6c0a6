//! Breusch-Pagan test for heteroskedasticity.

use crate::solvers::{FittedRegressor, OlsRegressor, RegressionError, Regressor};
use faer::{Col, Mat};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of a Breusch-Pagan test.
#[derive(Debug, Clone)]
pub struct HeteroskedasticityTest {
    /// Lagrange multiplier statistic, n · R² of the auxiliary regression.
    pub lm_statistic: f64,
    /// P-value under the χ² null.
    pub p_value: f64,
    /// Degrees of freedom of the χ² reference distribution.
    pub df: usize,
}

impl HeteroskedasticityTest {
    /// Whether the constant-variance assumption survives at level `alpha`.
    pub fn is_adequate(&self, alpha: f64) -> bool {
        self.p_value >= alpha
    }
}

/// Breusch-Pagan test against the fitted values.
///
/// Regresses the squared residuals on the fitted values and compares
/// LM = n · R² of that auxiliary fit to χ²(1). A small p-value means the
/// residual spread grows (or shrinks) with the predicted level, the classic
/// funnel shape that motivates a variance-stabilizing response transform.
pub fn breusch_pagan(
    residuals: &Col<f64>,
    fitted_values: &Col<f64>,
) -> Result<HeteroskedasticityTest, RegressionError> {
    let n = residuals.nrows();
    if n != fitted_values.nrows() {
        return Err(RegressionError::DimensionMismatch {
            x_rows: fitted_values.nrows(),
            y_len: n,
        });
    }

    let sq_residuals = Col::from_fn(n, |i| residuals[i] * residuals[i]);
    let aux_x = Mat::from_fn(n, 1, |i, _| fitted_values[i]);

    let aux_fit = OlsRegressor::builder()
        .with_intercept(true)
        .compute_inference(false)
        .build()
        .fit(&aux_x, &sq_residuals)?;

    let lm_statistic = n as f64 * aux_fit.r_squared();
    let df = 1;

    let p_value = match ChiSquared::new(df as f64) {
        Ok(dist) => 1.0 - dist.cdf(lm_statistic),
        Err(_) => f64::NAN,
    };

    Ok(HeteroskedasticityTest {
        lm_statistic,
        p_value,
        df,
    })
}
