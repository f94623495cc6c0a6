//! Variance Inflation Factor for multicollinearity detection.

use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
use faer::{Col, Mat};

/// Compute the Variance Inflation Factor for each predictor column.
///
/// VIF_j = 1 / (1 − R²_j), where R²_j comes from regressing x_j on all
/// other predictors.
///
/// # Interpretation
/// - VIF = 1: no correlation with other predictors
/// - VIF > 5: problematic multicollinearity (some sources use 10)
pub fn variance_inflation_factor(x: &Mat<f64>) -> Col<f64> {
    let n = x.nrows();
    let p = x.ncols();

    if n < 3 || p < 2 {
        return Col::from_fn(p, |_| 1.0);
    }

    let model = OlsRegressor::builder()
        .with_intercept(true)
        .compute_inference(false)
        .build();

    Col::from_fn(p, |j| {
        let x_other = Mat::from_fn(n, p - 1, |i, k| {
            let col = if k < j { k } else { k + 1 };
            x[(i, col)]
        });
        let y_j = Col::from_fn(n, |i| x[(i, j)]);

        match model.fit(&x_other, &y_j) {
            Ok(fitted) => {
                let r_squared = fitted.r_squared();
                if r_squared < 1.0 - 1e-14 {
                    (1.0 / (1.0 - r_squared)).max(1.0)
                } else {
                    f64::INFINITY
                }
            }
            // A failed auxiliary fit means the OTHER columns are degenerate,
            // not that x_j is explained by them.
            Err(_) => 1.0,
        }
    })
}

/// Indices of predictors with VIF above the threshold.
pub fn high_vif_predictors(vif: &Col<f64>, threshold: f64) -> Vec<usize> {
    vif.iter()
        .enumerate()
        .filter(|(_, &v)| v > threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Iteratively drop collinear predictors until every VIF is at or below
/// the threshold.
///
/// Each round flags the columns with VIF above the threshold and removes
/// the one whose standalone regression against `y` explains the least,
/// so the better univariate predictor of each collinear cluster survives.
/// Returns the retained column indices of `x`, in their original order.
pub fn prune_by_vif(x: &Mat<f64>, y: &Col<f64>, threshold: f64) -> Vec<usize> {
    let n = x.nrows();
    let mut kept: Vec<usize> = (0..x.ncols()).collect();

    let model = OlsRegressor::builder()
        .with_intercept(true)
        .compute_inference(false)
        .build();

    loop {
        if kept.len() < 2 {
            break;
        }

        let x_kept = Mat::from_fn(n, kept.len(), |i, k| x[(i, kept[k])]);
        let vif = variance_inflation_factor(&x_kept);

        let offenders = high_vif_predictors(&vif, threshold);
        if offenders.is_empty() {
            break;
        }

        let mut weakest = offenders[0];
        let mut weakest_r2 = f64::INFINITY;
        for &k in &offenders {
            let single = Mat::from_fn(n, 1, |i, _| x[(i, kept[k])]);
            let r2 = match model.fit(&single, y) {
                Ok(fitted) => fitted.r_squared(),
                Err(_) => 0.0,
            };
            if r2 < weakest_r2 {
                weakest_r2 = r2;
                weakest = k;
            }
        }

        kept.remove(weakest);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near_orthogonal_design(n: usize) -> Mat<f64> {
        Mat::from_fn(n, 2, |i, j| {
            if j == 0 {
                ((i * 7) % 13) as f64
            } else {
                ((i * 5) % 11) as f64
            }
        })
    }

    #[test]
    fn test_vif_near_one_for_unrelated_columns() {
        let x = near_orthogonal_design(60);
        let vif = variance_inflation_factor(&x);

        for v in vif.iter() {
            assert!(*v < 2.0, "VIF {v} unexpectedly high");
        }
    }

    #[test]
    fn test_vif_high_for_near_duplicate_columns() {
        let x = Mat::from_fn(40, 2, |i, j| {
            let base = i as f64;
            if j == 0 {
                base
            } else {
                base + 0.001 * ((i % 3) as f64)
            }
        });
        let vif = variance_inflation_factor(&x);

        assert!(vif[0] > 100.0);
        assert!(vif[1] > 100.0);
    }

    #[test]
    fn test_high_vif_predictors_thresholding() {
        let mut vif = Col::from_fn(4, |_| 1.2);
        vif[1] = 12.0;
        vif[3] = 5.1;

        assert_eq!(high_vif_predictors(&vif, 5.0), vec![1, 3]);
        assert_eq!(high_vif_predictors(&vif, 20.0), Vec::<usize>::new());
    }

    #[test]
    fn test_single_column_vif_is_one() {
        let x = Mat::from_fn(20, 1, |i, _| i as f64);
        let vif = variance_inflation_factor(&x);
        assert!((vif[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_prune_keeps_stronger_predictor() {
        // x0 and x1 are nearly identical; x1 tracks y slightly better.
        let n = 50;
        let noise = |i: usize| (((i * 17) % 7) as f64 - 3.0) * 0.1;
        let x = Mat::from_fn(n, 2, |i, j| {
            let base = i as f64;
            if j == 0 {
                base + noise(i) * 3.0
            } else {
                base + noise(i + 1)
            }
        });
        let y = Col::from_fn(n, |i| 2.0 * x[(i, 1)] + noise(i + 2));

        let kept = prune_by_vif(&x, &y, 5.0);
        assert_eq!(kept, vec![1]);
    }

    #[test]
    fn test_prune_no_op_when_clean() {
        let x = near_orthogonal_design(60);
        let y = Col::from_fn(60, |i| x[(i, 0)] + x[(i, 1)]);

        let kept = prune_by_vif(&x, &y, 5.0);
        assert_eq!(kept, vec![0, 1]);
    }
}
