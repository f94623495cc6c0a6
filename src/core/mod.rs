//! Core types for regression analysis.

mod options;
mod result;
pub(crate) mod stats;

pub use options::{OptionsError, RegressionOptions, RegressionOptionsBuilder};
pub use result::RegressionResult;
