//! Statistical inference (standard errors, t-statistics, p-values,
//! confidence intervals).

mod coefficient;

pub use coefficient::CoefficientInference;
