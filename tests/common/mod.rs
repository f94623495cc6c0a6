//! Shared helpers for integration tests.

#![allow(dead_code)]

use faer::{Col, Mat};

/// Deterministic pseudo-random generator for test data (LCG, values in
/// [-1, 1]).
pub struct TestRng {
    state: u64,
}

impl TestRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        ((self.state >> 33) as u32 as f64) / (u32::MAX as f64) * 2.0 - 1.0
    }
}

/// A linear response over a random design: y = intercept + X * coefs + noise.
pub fn linear_data(
    seed: u64,
    n: usize,
    coefs: &[f64],
    intercept: f64,
    noise_scale: f64,
) -> (Mat<f64>, Col<f64>) {
    let mut rng = TestRng::new(seed);
    let p = coefs.len();
    let x = Mat::from_fn(n, p, |_, _| rng.next() * 3.0);
    let y = Col::from_fn(n, |i| {
        let mut v = intercept;
        for j in 0..p {
            v += coefs[j] * x[(i, j)];
        }
        v + rng.next() * noise_scale
    });
    (x, y)
}
