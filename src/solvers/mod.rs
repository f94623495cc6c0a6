//! Regression solvers implementing the estimation methods used in the
//! workflow.

mod huber;
mod ols;
mod pls;
mod traits;
mod wls;

pub use huber::{FittedHuber, HuberRegressor, HuberRegressorBuilder};
pub use ols::{FittedOls, OlsRegressor, OlsRegressorBuilder};
pub use pls::{FittedPls, PlsRegressor, PlsRegressorBuilder};
pub use traits::{FittedRegressor, RegressionError, Regressor};
pub use wls::{FittedWls, WlsRegressor, WlsRegressorBuilder};
