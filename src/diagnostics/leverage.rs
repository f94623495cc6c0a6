//! Leverage (hat matrix diagonal) calculations.

use faer::{Col, Mat};

/// Design matrix with an optional leading intercept column.
fn build_design_matrix(x: &Mat<f64>, with_intercept: bool) -> Mat<f64> {
    let n = x.nrows();
    let p = x.ncols();

    if with_intercept {
        Mat::from_fn(n, p + 1, |i, j| if j == 0 { 1.0 } else { x[(i, j - 1)] })
    } else {
        x.to_owned()
    }
}

/// (X'X)^(-1) via QR and back-substitution.
fn cross_product_inverse(design: &Mat<f64>) -> Mat<f64> {
    let p = design.ncols();
    let xtx = design.transpose() * design;

    let qr = xtx.qr();
    let q = qr.compute_Q();
    let r = qr.R().to_owned();
    let qt = q.transpose().to_owned();

    let mut inv: Mat<f64> = Mat::zeros(p, p);
    for col in 0..p {
        for i in (0..p).rev() {
            if r[(i, i)].abs() < 1e-14 {
                continue;
            }
            let mut sum = qt[(i, col)];
            for j in (i + 1)..p {
                sum -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = sum / r[(i, i)];
        }
    }
    inv
}

/// Compute leverage values, the diagonal of H = X(X'X)^(-1)X'.
///
/// # Properties
/// - h_ii ∈ [0, 1]
/// - Σ h_ii = p (number of parameters)
/// - Points with h_ii > 2p/n are considered high leverage
pub fn compute_leverage(x: &Mat<f64>, with_intercept: bool) -> Col<f64> {
    let n = x.nrows();
    let design = build_design_matrix(x, with_intercept);
    let p = design.ncols();
    let inv = cross_product_inverse(&design);

    Col::from_fn(n, |i| {
        let mut h_ii = 0.0;
        for j in 0..p {
            for k in 0..p {
                h_ii += design[(i, j)] * inv[(j, k)] * design[(i, k)];
            }
        }
        h_ii.clamp(0.0, 1.0)
    })
}

/// Indices of observations with leverage above the threshold.
///
/// Default threshold is 2p/n.
pub fn high_leverage_points(
    leverage: &Col<f64>,
    n_params: usize,
    threshold: Option<f64>,
) -> Vec<usize> {
    let n = leverage.nrows();
    let cutoff = threshold.unwrap_or(2.0 * n_params as f64 / n as f64);

    leverage
        .iter()
        .enumerate()
        .filter(|(_, &h)| h > cutoff)
        .map(|(i, _)| i)
        .collect()
}
