//! Regression diagnostics workflow for college application counts.
//!
//! This library implements the full exploratory modelling sequence for the
//! bundled college admissions dataset (777 institutions): a baseline OLS fit,
//! influence analysis via Cook's distance, robust and weighted refitting,
//! Box-Cox / Box-Tidwell transform selection, stepwise interaction and best
//! subset search with VIF pruning, and information-criterion model comparison.
//!
//! # Example
//!
//! ```rust,ignore
//! use collegefit::prelude::*;
//!
//! let data = College::load()?;
//! let spec = ModelSpec::response("apps")
//!     .with_main("accept")
//!     .with_main("top25perc");
//! let (x, y, _) = spec.design(&data)?;
//!
//! let fitted = OlsRegressor::builder().with_intercept(true).build().fit(&x, &y)?;
//! println!("adjusted R² = {}", fitted.result().adj_r_squared);
//! ```
//!
//! Every stage produces immutable artifacts; diagnostics are informational and
//! never alter a model. Structural decisions flow through an explicit
//! [`pipeline::SelectionPolicy`].

pub mod core;
pub mod data;
pub mod diagnostics;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod selection;
pub mod solvers;
pub mod transform;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{RegressionOptions, RegressionOptionsBuilder, RegressionResult};
    pub use crate::data::{College, DataError, Dataset};
    pub use crate::diagnostics::{
        breusch_pagan, compute_leverage, cooks_distance, high_leverage_points,
        high_vif_predictors, influence_weights, influential_cooks, prune_by_vif,
        residual_outliers, standardized_residuals,
        studentized_residuals, variance_inflation_factor, HeteroskedasticityTest,
    };
    pub use crate::model::{ModelError, ModelSpec, Term};
    pub use crate::pipeline::{run_college_analysis, AnalysisReport, SelectionPolicy, StageReport};
    pub use crate::selection::{
        best_subsets, forward_interactions, rank_by_criterion, Candidate, Criterion,
    };
    pub use crate::solvers::{
        FittedHuber, FittedOls, FittedPls, FittedRegressor, FittedWls, HuberRegressor,
        OlsRegressor, PlsRegressor, RegressionError, Regressor, WlsRegressor,
    };
    pub use crate::transform::{box_tidwell, boxcox_apply, boxcox_search, BoxCoxFit, TransformError};
}

pub use crate::core::{RegressionOptions, RegressionOptionsBuilder, RegressionResult};
pub use crate::data::{College, DataError, Dataset};
pub use crate::solvers::{FittedRegressor, RegressionError, Regressor};
