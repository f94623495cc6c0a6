//! Matrix and vector utility functions.

use faer::{Col, Mat};

/// Detect columns with zero variance.
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_rows = x.nrows();
    let n_cols = x.ncols();

    if n_rows == 0 {
        return vec![true; n_cols];
    }

    (0..n_cols)
        .map(|j| {
            let first = x[(0, j)];
            (1..n_rows).all(|i| (x[(i, j)] - first).abs() < tolerance)
        })
        .collect()
}

/// Center a matrix by subtracting column means; returns the centered matrix
/// and the means.
pub fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Col<f64>) {
    let n_rows = x.nrows();
    let n_cols = x.ncols();

    let mut means = Col::zeros(n_cols);
    for j in 0..n_cols {
        let sum: f64 = (0..n_rows).map(|i| x[(i, j)]).sum();
        means[j] = sum / n_rows as f64;
    }

    let centered = Mat::from_fn(n_rows, n_cols, |i, j| x[(i, j)] - means[j]);
    (centered, means)
}

/// Center a vector by subtracting the mean; returns the centered vector and
/// the mean.
pub fn center_vector(y: &Col<f64>) -> (Col<f64>, f64) {
    let n = y.nrows();
    let mean: f64 = y.iter().sum::<f64>() / n as f64;
    (Col::from_fn(n, |i| y[i] - mean), mean)
}

/// Median of absolute values. Used for the MAD scale estimate in robust
/// refitting.
pub fn median_absolute(values: &Col<f64>) -> f64 {
    let mut abs: Vec<f64> = values.iter().map(|v| v.abs()).collect();
    abs.sort_by(f64::total_cmp);

    let n = abs.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        abs[n / 2]
    } else {
        0.5 * (abs[n / 2 - 1] + abs[n / 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_constant_columns() {
        let mut x = Mat::zeros(5, 3);
        for i in 0..5 {
            x[(i, 0)] = 1.0;
            x[(i, 1)] = i as f64;
            x[(i, 2)] = 2.0;
        }

        let constant = detect_constant_columns(&x, 1e-10);
        assert!(constant[0]);
        assert!(!constant[1]);
        assert!(constant[2]);
    }

    #[test]
    fn test_center_columns_sums_to_zero() {
        let x = Mat::from_fn(4, 2, |i, j| ((i + 1) * (j + 1)) as f64 * 10.0);
        let (centered, means) = center_columns(&x);

        assert!((means[0] - 25.0).abs() < 1e-10);
        for j in 0..2 {
            let sum: f64 = (0..4).map(|i| centered[(i, j)]).sum();
            assert!(sum.abs() < 1e-10);
        }
    }

    #[test]
    fn test_center_vector() {
        let y = Col::from_fn(4, |i| (i + 1) as f64);
        let (centered, mean) = center_vector(&y);

        assert!((mean - 2.5).abs() < 1e-10);
        assert!(centered.iter().sum::<f64>().abs() < 1e-10);
    }

    #[test]
    fn test_median_absolute_odd_even() {
        let odd = Col::from_fn(5, |i| i as f64 - 2.0); // |-2,-1,0,1,2|
        assert!((median_absolute(&odd) - 1.0).abs() < 1e-12);

        let even = Col::from_fn(4, |i| (i + 1) as f64); // 1,2,3,4
        assert!((median_absolute(&even) - 2.5).abs() < 1e-12);
    }
}
