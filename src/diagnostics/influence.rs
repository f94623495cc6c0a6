//! Influence measures built on Cook's distance.

use faer::Col;

/// Compute Cook's distance for each observation.
///
/// D_i = (e_i² / (p · MSE)) · (h_ii / (1 − h_ii)²)
///
/// Observations with D_i above 4/n (or above 1) are typically treated as
/// influential.
pub fn cooks_distance(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    mse: f64,
    n_params: usize,
) -> Col<f64> {
    let n = residuals.nrows();

    if mse <= 0.0 || !mse.is_finite() || n_params == 0 {
        return Col::from_fn(n, |_| f64::NAN);
    }

    Col::from_fn(n, |i| {
        let e_i = residuals[i];
        let h_ii = leverage[i];
        let one_minus_h = (1.0 - h_ii).max(1e-14);

        let d_i = (e_i * e_i / (n_params as f64 * mse)) * (h_ii / (one_minus_h * one_minus_h));
        if d_i.is_finite() {
            d_i.max(0.0)
        } else {
            f64::NAN
        }
    })
}

/// Indices of observations with Cook's distance above the threshold.
///
/// Default threshold is 4/n, computed from the length of `cooks_d`.
pub fn influential_cooks(cooks_d: &Col<f64>, threshold: Option<f64>) -> Vec<usize> {
    let n = cooks_d.nrows();
    let cutoff = threshold.unwrap_or(4.0 / n as f64);

    cooks_d
        .iter()
        .enumerate()
        .filter(|(_, &d)| d.is_finite() && d > cutoff)
        .map(|(i, _)| i)
        .collect()
}

/// Downweighting scheme derived from Cook's distance.
///
/// Observations at or below the cutoff keep weight 1; beyond it the weight
/// decays as cutoff/D_i, so an observation twice over the cutoff counts
/// half. Feeding these into a WLS refit keeps every row in the fit while
/// limiting the pull of the influential ones. Default cutoff is 4/n.
pub fn influence_weights(cooks_d: &Col<f64>, cutoff: Option<f64>) -> Col<f64> {
    let n = cooks_d.nrows();
    let cutoff = cutoff.unwrap_or(4.0 / n as f64);

    Col::from_fn(n, |i| {
        let d = cooks_d[i];
        if !d.is_finite() || d <= cutoff {
            1.0
        } else {
            cutoff / d
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooks_distance_non_negative() {
        let residuals = Col::from_fn(10, |i| (i as f64) - 4.5);
        let leverage = Col::from_fn(10, |_| 0.2);

        let cooks = cooks_distance(&residuals, &leverage, 2.0, 3);
        for d in cooks.iter() {
            assert!(*d >= 0.0);
        }
    }

    #[test]
    fn test_zero_residual_zero_distance() {
        let mut residuals = Col::from_fn(10, |_| 1.0);
        residuals[3] = 0.0;
        let leverage = Col::from_fn(10, |_| 0.3);

        let cooks = cooks_distance(&residuals, &leverage, 1.0, 2);
        assert!(cooks[3].abs() < 1e-15);
    }

    #[test]
    fn test_influential_cooks_default_cutoff() {
        // n = 8, default cutoff 0.5
        let mut cooks = Col::from_fn(8, |_| 0.1);
        cooks[2] = 0.9;
        cooks[5] = 0.6;

        let flagged = influential_cooks(&cooks, None);
        assert_eq!(flagged, vec![2, 5]);
    }

    #[test]
    fn test_influence_weights_decay() {
        // n = 8, cutoff 0.5
        let mut cooks = Col::from_fn(8, |_| 0.1);
        cooks[2] = 1.0;

        let weights = influence_weights(&cooks, None);
        assert!((weights[0] - 1.0).abs() < 1e-15);
        assert!((weights[2] - 0.5).abs() < 1e-15);
    }
}
