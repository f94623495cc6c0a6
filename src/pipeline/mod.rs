//! End-to-end exploratory analysis of the bundled college dataset.
//!
//! Each stage consumes immutable inputs and produces a [`StageReport`]:
//! a ranked candidate list, free-form notes, and a [`Decision`] naming the
//! model carried forward and why. The full trail comes back in the
//! [`AnalysisReport`], so a reader can audit every choice the run made.

use crate::data::{College, DataError};
use crate::diagnostics::{
    breusch_pagan, compute_leverage, cooks_distance, influence_weights, influential_cooks,
    prune_by_vif,
};
use crate::model::{ModelError, ModelSpec};
use crate::selection::{
    best_subsets, forward_interactions, rank_by_criterion, Candidate, Criterion, SelectionError,
};
use crate::solvers::{
    FittedRegressor, HuberRegressor, OlsRegressor, PlsRegressor, RegressionError, Regressor,
    WlsRegressor,
};
use crate::transform::{box_tidwell, boxcox_apply, boxcox_search, TransformError};
use thiserror::Error;

/// Errors from running the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("fit error: {0}")]
    Fit(#[from] RegressionError),

    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
}

/// The model a stage carried forward, with the reason.
#[derive(Debug, Clone)]
pub struct Decision {
    pub chosen: String,
    pub reason: String,
}

/// Outcome of one pipeline stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub name: String,
    /// Candidates ranked by the active criterion. Only candidates fit on
    /// the same rows and response scale enter one report.
    pub candidates: Vec<Candidate>,
    pub notes: Vec<String>,
    pub decision: Decision,
}

/// How the final model is picked from the ranked candidates.
///
/// `Lowest` is the default automatic rule; `Named` is the hook for a human
/// override: the run still produces the full ranking, the caller just pins
/// the outcome.
#[derive(Debug, Clone)]
pub enum SelectionPolicy {
    Lowest(Criterion),
    Named(String),
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::Lowest(Criterion::Aic)
    }
}

impl SelectionPolicy {
    fn criterion(&self) -> Criterion {
        match self {
            SelectionPolicy::Lowest(c) => *c,
            SelectionPolicy::Named(_) => Criterion::Aic,
        }
    }

    fn choose(&self, ranked: &[Candidate]) -> Option<Candidate> {
        match self {
            SelectionPolicy::Lowest(_) => ranked.first().cloned(),
            SelectionPolicy::Named(label) => ranked.iter().find(|c| &c.label == label).cloned(),
        }
    }
}

/// Full decision trail plus the model the policy settled on.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub stages: Vec<StageReport>,
    pub final_model: Candidate,
}

impl AnalysisReport {
    /// Look up a stage report by name.
    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.name == name)
    }
}

/// Run the exploratory workflow over the bundled college data.
///
/// Stages: baseline OLS on all predictors, influence analysis, robust and
/// influence-weighted refits, response-transform assessment, predictor
/// power-term assessment, forward interaction search, VIF pruning with
/// best-subset selection, and a final criterion ranking resolved by
/// `policy`.
pub fn run_college_analysis(policy: &SelectionPolicy) -> Result<AnalysisReport, AnalysisError> {
    let data = College::load()?;
    let criterion = policy.criterion();
    let mut stages = Vec::new();
    let mut finalists: Vec<Candidate> = Vec::new();

    // Stage 1: baseline on every predictor
    let spec_full = ModelSpec::all_predictors(&data, College::RESPONSE);
    let (x_full, y_full, labels_full) = spec_full.design(&data)?;
    let baseline = OlsRegressor::builder().build().fit(&x_full, &y_full)?;
    let baseline_result = baseline.result().clone();
    log::info!(
        "baseline: {} predictors, adj R^2 = {:.4}",
        labels_full.len(),
        baseline_result.adj_r_squared
    );
    stages.push(StageReport {
        name: "baseline".into(),
        candidates: vec![Candidate::new("baseline", baseline_result.clone())],
        notes: vec![format!(
            "adj R^2 = {:.4}, AIC = {:.1}",
            baseline_result.adj_r_squared, baseline_result.aic
        )],
        decision: Decision {
            chosen: "baseline".into(),
            reason: "reference model for all later comparisons".into(),
        },
    });
    finalists.push(Candidate::new("baseline", baseline_result.clone()));

    // Stage 2: influence analysis
    let leverage = compute_leverage(&x_full, true);
    let cooks = cooks_distance(
        &baseline_result.residuals,
        &leverage,
        baseline_result.mse,
        baseline_result.n_parameters,
    );
    let flagged = influential_cooks(&cooks, None);
    log::info!("influence: {} rows over the 4/n cutoff", flagged.len());

    let filtered = data.drop_rows(&flagged);
    let (x_filt, y_filt, _) = spec_full.design(&filtered)?;
    let filtered_fit = OlsRegressor::builder().build().fit(&x_filt, &y_filt)?;
    stages.push(StageReport {
        name: "influence".into(),
        candidates: Vec::new(),
        notes: vec![
            format!("{} influential rows (Cook's distance > 4/n)", flagged.len()),
            format!(
                "refit without them: adj R^2 = {:.4} (different rows, not ranked)",
                filtered_fit.result().adj_r_squared
            ),
        ],
        decision: Decision {
            chosen: "baseline".into(),
            reason: "influential rows are downweighted in the next stage instead of deleted"
                .into(),
        },
    });

    // Stage 3: robust and influence-weighted refits on the full rows
    let huber = HuberRegressor::builder().build().fit(&x_full, &y_full)?;
    let weights = influence_weights(&cooks, None);
    let weighted = WlsRegressor::builder()
        .weights(weights)
        .build()
        .fit(&x_full, &y_full)?;
    log::info!(
        "robust refits: huber adj R^2 = {:.4}, weighted adj R^2 = {:.4}",
        huber.result().adj_r_squared,
        weighted.result().adj_r_squared
    );

    let robust_ranked = rank_by_criterion(
        vec![
            Candidate::new("baseline", baseline_result.clone()),
            Candidate::new("huber", huber.result().clone()),
            Candidate::new("weighted", weighted.result().clone()),
        ],
        criterion,
    );
    let robust_choice = robust_ranked
        .first()
        .map(|c| c.label.clone())
        .unwrap_or_else(|| "baseline".into());
    stages.push(StageReport {
        name: "robust".into(),
        candidates: robust_ranked,
        notes: vec![format!(
            "huber converged in {} iterations",
            huber.iterations()
        )],
        decision: Decision {
            chosen: robust_choice,
            reason: "lowest criterion among same-scale refits".into(),
        },
    });
    finalists.push(Candidate::new("huber", huber.result().clone()));
    finalists.push(Candidate::new("weighted", weighted.result().clone()));

    // Stage 4: response transform assessment
    let bp_raw = breusch_pagan(&baseline_result.residuals, &baseline_result.fitted_values)?;
    let boxcox = boxcox_search(&x_full, &y_full)?;
    let mut transform_notes = vec![
        format!(
            "Breusch-Pagan on baseline: LM = {:.1}, p = {:.2e}",
            bp_raw.lm_statistic, bp_raw.p_value
        ),
        format!("Box-Cox lambda = {:.2}", boxcox.lambda),
    ];

    let transform_decision = if bp_raw.is_adequate(0.05) {
        Decision {
            chosen: "raw".into(),
            reason: "constant variance not rejected; no transform needed".into(),
        }
    } else {
        let y_transformed = boxcox_apply(&y_full, boxcox.lambda)?;
        let transformed_fit = OlsRegressor::builder().build().fit(&x_full, &y_transformed)?;
        let bp_after = breusch_pagan(
            &transformed_fit.result().residuals,
            &transformed_fit.result().fitted_values,
        )?;
        transform_notes.push(format!(
            "Breusch-Pagan after transform: LM = {:.1}, p = {:.2e}",
            bp_after.lm_statistic, bp_after.p_value
        ));
        if bp_after.is_adequate(0.05) {
            Decision {
                chosen: "transformed".into(),
                reason: format!(
                    "lambda = {:.2} stabilizes the variance; transformed-scale fit reported \
                     separately (criteria are not comparable across scales)",
                    boxcox.lambda
                ),
            }
        } else {
            Decision {
                chosen: "raw".into(),
                reason: "transform does not stabilize the variance; staying on the raw scale"
                    .into(),
            }
        }
    };
    log::info!("transform: {}", transform_decision.reason);
    stages.push(StageReport {
        name: "transform".into(),
        candidates: Vec::new(),
        notes: transform_notes,
        decision: transform_decision,
    });

    // Stage 5: predictor power term for the dominant predictor
    let accept_idx = labels_full
        .iter()
        .position(|l| l == "accept")
        .unwrap_or(0);
    let mut power_notes = Vec::new();
    let power_decision = match box_tidwell(&x_full, &y_full, accept_idx) {
        Ok(alpha) => {
            power_notes.push(format!("Box-Tidwell exponent for accept: {alpha:.3}"));
            if (alpha - 1.0).abs() > 0.25 {
                let powered_spec = spec_full.clone().with_power("accept", alpha);
                let (x_pow, y_pow, _) = powered_spec.design(&data)?;
                let powered = OlsRegressor::builder().build().fit(&x_pow, &y_pow)?;
                if powered.result().aic < baseline_result.aic {
                    finalists.push(Candidate::new("power", powered.result().clone()));
                    Decision {
                        chosen: "power".into(),
                        reason: format!("accept^{alpha:.2} term lowers the AIC"),
                    }
                } else {
                    Decision {
                        chosen: "baseline".into(),
                        reason: "power term does not improve the criterion".into(),
                    }
                }
            } else {
                Decision {
                    chosen: "baseline".into(),
                    reason: "exponent near 1; accept enters linearly".into(),
                }
            }
        }
        Err(TransformError::NonPositiveValues) => Decision {
            chosen: "baseline".into(),
            reason: "predictor not strictly positive; power family undefined".into(),
        },
        Err(e) => return Err(e.into()),
    };
    log::info!("power terms: {}", power_decision.reason);
    stages.push(StageReport {
        name: "power".into(),
        candidates: Vec::new(),
        notes: power_notes,
        decision: power_decision,
    });

    // Stage 6: forward interaction search
    let interaction_spec = forward_interactions(&data, &spec_full)?;
    let added = interaction_spec.terms().len() - spec_full.terms().len();
    log::info!("stepwise: {} interaction terms added", added);
    let (x_int, y_int, _) = interaction_spec.design(&data)?;
    let interaction_fit = OlsRegressor::builder().build().fit(&x_int, &y_int)?;
    stages.push(StageReport {
        name: "interactions".into(),
        candidates: vec![Candidate::new(
            "interactions",
            interaction_fit.result().clone(),
        )],
        notes: vec![format!("{added} interaction terms added by forward AIC search")],
        decision: Decision {
            chosen: if added > 0 { "interactions" } else { "baseline" }.into(),
            reason: if added > 0 {
                "forward search found AIC-improving products".into()
            } else {
                "no pairwise product improved the AIC".into()
            },
        },
    });
    if added > 0 {
        finalists.push(Candidate::new("interactions", interaction_fit.result().clone()));
    }

    // Stage 7: multicollinearity pruning and best subsets
    let kept = prune_by_vif(&x_full, &y_full, 5.0);
    let dropped: Vec<&str> = (0..labels_full.len())
        .filter(|j| !kept.contains(j))
        .map(|j| labels_full[j].as_str())
        .collect();
    log::info!("vif: dropped {:?}", dropped);

    let mut pruned_spec = spec_full.clone();
    for name in &dropped {
        pruned_spec = pruned_spec.without_main(name);
    }
    let subset_spec = best_subsets(&data, &pruned_spec, 4)?;
    let (x_sub, y_sub, subset_labels) = subset_spec.design(&data)?;
    let subset_fit = OlsRegressor::builder().build().fit(&x_sub, &y_sub)?;
    log::info!("subsets: kept {:?}", subset_labels);
    stages.push(StageReport {
        name: "parsimony".into(),
        candidates: vec![Candidate::new("subset", subset_fit.result().clone())],
        notes: vec![
            format!("VIF pruning dropped: {}", dropped.join(", ")),
            format!("best subset by BIC: {}", subset_labels.join(", ")),
        ],
        decision: Decision {
            chosen: "subset".into(),
            reason: "smallest subset minimizing BIC after collinearity pruning".into(),
        },
    });
    finalists.push(Candidate::new("subset", subset_fit.result().clone()));

    // A latent-component cross-check on the collinear design
    let pls = PlsRegressor::builder()
        .n_components(5)
        .build()
        .fit(&x_full, &y_full)?;
    finalists.push(Candidate::new("pls", pls.result().clone()));

    // Stage 8: final ranking under the policy
    let ranked = rank_by_criterion(finalists, criterion);
    let final_model = policy
        .choose(&ranked)
        .or_else(|| ranked.first().cloned())
        .ok_or(SelectionError::NoCandidates)
        .map_err(AnalysisError::Selection)?;
    log::info!("final model: {}", final_model.label);
    stages.push(StageReport {
        name: "final".into(),
        candidates: ranked,
        notes: Vec::new(),
        decision: Decision {
            chosen: final_model.label.clone(),
            reason: match policy {
                SelectionPolicy::Lowest(Criterion::Aic) => "lowest AIC".into(),
                SelectionPolicy::Lowest(Criterion::Bic) => "lowest BIC".into(),
                SelectionPolicy::Named(label) => format!("pinned by caller: {label}"),
            },
        },
    });

    Ok(AnalysisReport {
        stages,
        final_model,
    })
}
