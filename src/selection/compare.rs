//! Ranking fitted candidates by information criterion.

use crate::core::RegressionResult;

/// A labelled fitted model entered into a comparison.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub label: String,
    pub result: RegressionResult,
}

impl Candidate {
    pub fn new(label: impl Into<String>, result: RegressionResult) -> Self {
        Self {
            label: label.into(),
            result,
        }
    }

    fn score(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Aic => self.result.aic,
            Criterion::Bic => self.result.bic,
        }
    }
}

/// Information criterion used for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Aic,
    Bic,
}

/// Sort candidates ascending by the chosen criterion (lower is better).
///
/// Criterion values are only comparable across models fit to the same
/// observations on the same response scale; the caller is responsible for
/// entering only commensurable candidates. Candidates with a NaN score
/// sort last.
pub fn rank_by_criterion(mut candidates: Vec<Candidate>, criterion: Criterion) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        let (sa, sb) = (a.score(criterion), b.score(criterion));
        match (sa.is_nan(), sb.is_nan()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal),
        }
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
    use faer::{Col, Mat};

    fn fit_result(n_cols: usize) -> RegressionResult {
        let x = Mat::from_fn(30, n_cols, |i, j| (((i + 1) * (j + 2)) % 11) as f64);
        let y = Col::from_fn(30, |i| {
            x[(i, 0)] * 2.0 + (((i * 7) % 5) as f64 - 2.0) * 0.3
        });
        OlsRegressor::builder()
            .compute_inference(false)
            .build()
            .fit(&x, &y)
            .unwrap()
            .result()
            .clone()
    }

    #[test]
    fn test_rank_ascending() {
        let lean = Candidate::new("lean", fit_result(1));
        let padded = Candidate::new("padded", fit_result(3));

        let ranked = rank_by_criterion(vec![padded, lean], Criterion::Bic);
        assert_eq!(ranked[0].label, "lean");
        assert!(ranked[0].result.bic <= ranked[1].result.bic);
    }

    #[test]
    fn test_nan_sorts_last() {
        let mut bad = fit_result(1);
        bad.aic = f64::NAN;

        let ranked = rank_by_criterion(
            vec![Candidate::new("bad", bad), Candidate::new("good", fit_result(1))],
            Criterion::Aic,
        );
        assert_eq!(ranked[0].label, "good");
    }
}
