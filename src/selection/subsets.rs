//! Exhaustive best-subset search over main effects.

use crate::data::Dataset;
use crate::model::ModelSpec;
use crate::selection::SelectionError;
use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};

fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    if k > n {
        return out;
    }
    loop {
        out.push(indices.clone());
        // Advance to the next combination in lexicographic order
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if indices[i] != i + n - k {
                break;
            }
        }
        if indices[i] == i + n - k {
            return out;
        }
        indices[i] += 1;
        for j in (i + 1)..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// Exhaustive subset search over the spec's main effects.
///
/// For every size up to `max_size` the RSS-minimal subset is kept; the
/// winner among those per-size champions is the one with the lowest BIC.
/// RSS comparisons within a size are fair (same parameter count); BIC
/// arbitrates across sizes. Subsets whose design fails to fit are skipped.
pub fn best_subsets(
    data: &Dataset,
    spec: &ModelSpec,
    max_size: usize,
) -> Result<ModelSpec, SelectionError> {
    let mains: Vec<String> = spec
        .main_effect_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let p = mains.len();
    let limit = max_size.min(p);

    let model = OlsRegressor::builder().compute_inference(false).build();

    let mut overall: Option<(Vec<usize>, f64)> = None;

    for size in 1..=limit {
        let mut size_best: Option<(Vec<usize>, f64, f64)> = None;

        for combo in combinations(p, size) {
            let mut candidate = ModelSpec::response(spec.response_name());
            for &idx in &combo {
                candidate = candidate.with_main(&mains[idx]);
            }

            let (x, y, _) = candidate.design(data)?;
            let fitted = match model.fit(&x, &y) {
                Ok(f) => f,
                Err(_) => continue,
            };
            let rss = fitted.result().rss();
            let bic = fitted.result().bic;

            let better = match &size_best {
                Some((_, best_rss, _)) => rss < *best_rss,
                None => true,
            };
            if better {
                size_best = Some((combo, rss, bic));
            }
        }

        if let Some((combo, rss, bic)) = size_best {
            log::debug!("best subset of size {size}: RSS {rss:.4}, BIC {bic:.2}");
            let better = match &overall {
                Some((_, best_bic)) => bic < *best_bic,
                None => true,
            };
            if better {
                overall = Some((combo, bic));
            }
        }
    }

    let (combo, _) = overall.ok_or(SelectionError::NoCandidates)?;
    let mut chosen = ModelSpec::response(spec.response_name());
    for idx in combo {
        chosen = chosen.with_main(&mains[idx]);
    }
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    #[test]
    fn test_combinations_count() {
        assert_eq!(combinations(5, 2).len(), 10);
        assert_eq!(combinations(4, 4).len(), 1);
        assert_eq!(combinations(3, 4).len(), 0);
        assert_eq!(combinations(5, 1), vec![vec![0], vec![1], vec![2], vec![3], vec![4]]);
    }

    #[test]
    fn test_picks_true_support() {
        // y depends only on a and c out of four predictors
        let n = 80;
        let col = |i: usize, j: usize| (((i + 1) * (j * j + 3)) % 13) as f64;
        let noise = |i: usize| (((i * 17) % 9) as f64 - 4.0) * 0.02;
        let values = Mat::from_fn(n, 5, |i, j| {
            if j == 0 {
                2.0 * col(i, 1) - 1.5 * col(i, 3) + noise(i)
            } else {
                col(i, j)
            }
        });
        let data = Dataset::new(
            ["y", "a", "b", "c", "d"].iter().map(|s| s.to_string()).collect(),
            values,
        );

        let spec = ModelSpec::all_predictors(&data, "y");
        let chosen = best_subsets(&data, &spec, 4).unwrap();

        let mut names = chosen.main_effect_names();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "c"]);
    }
}
