//! Regression diagnostics: leverage, influence, residual screening,
//! multicollinearity, and heteroskedasticity.
//!
//! These drive the exploratory workflow: fit a baseline, find the
//! observations and predictors that distort it, then refit.
//!
//! ```rust,ignore
//! use collegefit::diagnostics::{compute_leverage, cooks_distance, influence_weights};
//!
//! let leverage = compute_leverage(&x, true);
//! let cooks = cooks_distance(&residuals, &leverage, mse, n_params);
//! let weights = influence_weights(&cooks, None);
//! ```

mod hetero;
mod influence;
mod leverage;
mod residuals;
mod vif;

pub use hetero::{breusch_pagan, HeteroskedasticityTest};
pub use influence::{cooks_distance, influence_weights, influential_cooks};
pub use leverage::{compute_leverage, high_leverage_points};
pub use residuals::{residual_outliers, standardized_residuals, studentized_residuals};
pub use vif::{high_vif_predictors, prune_by_vif, variance_inflation_factor};
