//! Model selection: forward interaction search, best subsets, and
//! criterion-based comparison.

mod compare;
mod stepwise;
mod subsets;

pub use compare::{rank_by_criterion, Candidate, Criterion};
pub use stepwise::forward_interactions;
pub use subsets::best_subsets;

use crate::model::ModelError;
use crate::solvers::RegressionError;
use thiserror::Error;

/// Errors from a selection procedure.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("model specification error: {0}")]
    Model(#[from] ModelError),

    #[error("fit error during selection: {0}")]
    Fit(#[from] RegressionError),

    /// Every candidate in a round failed to fit.
    #[error("no candidate model could be fit")]
    NoCandidates,
}
