//! Power transforms for the response (Box-Cox) and individual predictors
//! (Box-Tidwell).

mod boxcox;
mod boxtidwell;

pub use boxcox::{boxcox_apply, boxcox_search, BoxCoxFit};
pub use boxtidwell::box_tidwell;

use crate::solvers::RegressionError;
use thiserror::Error;

/// Errors from transform estimation.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Power-transform families are only defined for strictly positive values.
    #[error("transform requires strictly positive values")]
    NonPositiveValues,

    #[error("transform fit failed: {0}")]
    Fit(#[from] RegressionError),
}
