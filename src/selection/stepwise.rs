//! Greedy forward search over pairwise interaction terms.

use crate::data::Dataset;
use crate::model::{ModelSpec, Term};
use crate::selection::SelectionError;
use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};

/// Fit the spec by OLS and return the AIC.
fn fit_aic(data: &Dataset, spec: &ModelSpec) -> Result<f64, SelectionError> {
    let (x, y, _) = spec.design(data)?;
    let fitted = OlsRegressor::builder()
        .compute_inference(false)
        .build()
        .fit(&x, &y)?;
    Ok(fitted.result().aic)
}

fn has_interaction(spec: &ModelSpec, a: &str, b: &str) -> bool {
    spec.terms().iter().any(|t| {
        matches!(t, Term::Interaction(x, y)
            if (x == a && y == b) || (x == b && y == a))
    })
}

/// Forward stepwise search over pairwise interactions of the spec's main
/// effects.
///
/// Each round fits every candidate interaction not yet in the model and
/// adds the one with the lowest AIC, stopping when no candidate strictly
/// improves on the current model. Candidates whose augmented design fails
/// to fit (for instance a singular interaction column) are skipped.
pub fn forward_interactions(
    data: &Dataset,
    spec: &ModelSpec,
) -> Result<ModelSpec, SelectionError> {
    let mut current = spec.clone();
    let mut current_aic = fit_aic(data, &current)?;

    loop {
        let mains: Vec<String> = current
            .main_effect_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut best: Option<(String, String, f64)> = None;
        for i in 0..mains.len() {
            for j in (i + 1)..mains.len() {
                let (a, b) = (&mains[i], &mains[j]);
                if has_interaction(&current, a, b) {
                    continue;
                }

                let candidate = current.clone().with_interaction(a, b);
                let aic = match fit_aic(data, &candidate) {
                    Ok(aic) => aic,
                    Err(SelectionError::Fit(_)) => continue,
                    Err(e) => return Err(e),
                };

                let improves = match &best {
                    Some((_, _, best_aic)) => aic < *best_aic,
                    None => true,
                };
                if improves {
                    best = Some((a.clone(), b.clone(), aic));
                }
            }
        }

        match best {
            Some((a, b, aic)) if aic < current_aic => {
                log::debug!("stepwise: adding {a}:{b} (AIC {current_aic:.2} -> {aic:.2})");
                current = current.with_interaction(&a, &b);
                current_aic = aic;
            }
            _ => break,
        }
    }

    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    #[test]
    fn test_true_interaction_is_added() {
        // y depends on a*b; the search should pick exactly that product
        let n = 60;
        let noise = |i: usize| (((i * 13) % 11) as f64 - 5.0) * 0.02;
        let values = Mat::from_fn(n, 3, |i, j| match j {
            0 => {
                let a = ((i * 3) % 7) as f64;
                let b = ((i * 5) % 9) as f64;
                1.0 + a + b + 2.0 * a * b + noise(i)
            }
            1 => ((i * 3) % 7) as f64,
            _ => ((i * 5) % 9) as f64,
        });
        let data = Dataset::new(
            vec!["y".to_string(), "a".to_string(), "b".to_string()],
            values,
        );

        let spec = ModelSpec::response("y").with_main("a").with_main("b");
        let selected = forward_interactions(&data, &spec).unwrap();

        assert!(has_interaction(&selected, "a", "b"));
    }

    #[test]
    fn test_no_interaction_added_for_additive_data() {
        let n = 60;
        let noise = |i: usize| (((i * 13) % 11) as f64 - 5.0) * 0.02;
        let values = Mat::from_fn(n, 3, |i, j| match j {
            0 => {
                let a = ((i * 3) % 7) as f64;
                let b = ((i * 5) % 9) as f64;
                1.0 + a + b + noise(i)
            }
            1 => ((i * 3) % 7) as f64,
            _ => ((i * 5) % 9) as f64,
        });
        let data = Dataset::new(
            vec!["y".to_string(), "a".to_string(), "b".to_string()],
            values,
        );

        let spec = ModelSpec::response("y").with_main("a").with_main("b");
        let selected = forward_interactions(&data, &spec).unwrap();

        assert_eq!(selected.terms().len(), 2);
    }
}
