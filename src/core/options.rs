//! Regression options and configuration.

use thiserror::Error;

/// Configuration options shared by the regression solvers.
#[derive(Debug, Clone)]
pub struct RegressionOptions {
    /// Whether to include an intercept term (default: true).
    pub with_intercept: bool,
    /// Whether to compute standard errors and inference statistics (default: true).
    pub compute_inference: bool,
    /// Confidence level for confidence intervals (default: 0.95).
    pub confidence_level: f64,
    /// Maximum iterations for iteratively reweighted solvers.
    pub max_iterations: usize,
    /// Convergence tolerance for iteratively reweighted solvers.
    pub tolerance: f64,
    /// Rank tolerance for QR decomposition.
    pub rank_tolerance: f64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            with_intercept: true,
            compute_inference: true,
            confidence_level: 0.95,
            max_iterations: 50,
            tolerance: 1e-8,
            rank_tolerance: 1e-10,
        }
    }
}

/// Errors that can occur when validating regression options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    #[error("max_iterations must be at least 1, got {0}")]
    InvalidMaxIterations(usize),
}

impl RegressionOptions {
    /// Create a new builder for regression options.
    pub fn builder() -> RegressionOptionsBuilder {
        RegressionOptionsBuilder::default()
    }

    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.confidence_level <= 0.0 || self.confidence_level >= 1.0 {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if self.tolerance <= 0.0 {
            return Err(OptionsError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations < 1 {
            return Err(OptionsError::InvalidMaxIterations(self.max_iterations));
        }
        Ok(())
    }
}

/// Builder for `RegressionOptions`.
#[derive(Debug, Clone, Default)]
pub struct RegressionOptionsBuilder {
    options: RegressionOptions,
}

impl RegressionOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.options.with_intercept = include;
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.options.compute_inference = compute;
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the maximum iterations for iterative solvers.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.options.max_iterations = max_iter;
        self
    }

    /// Set the convergence tolerance.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.options.tolerance = tol;
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Build and validate the options.
    pub fn build(self) -> Result<RegressionOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }

    /// Build the options without validation.
    pub fn build_unchecked(self) -> RegressionOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = RegressionOptions::default();
        assert!(opts.with_intercept);
        assert!(opts.compute_inference);
        assert!((opts.confidence_level - 0.95).abs() < 1e-10);
    }

    #[test]
    fn test_builder() {
        let opts = RegressionOptions::builder()
            .with_intercept(false)
            .tolerance(1e-6)
            .build()
            .unwrap();

        assert!(!opts.with_intercept);
        assert!((opts.tolerance - 1e-6).abs() < 1e-14);
    }

    #[test]
    fn test_validation_invalid_confidence_level() {
        let result = RegressionOptions::builder().confidence_level(1.0).build();
        assert!(matches!(
            result,
            Err(OptionsError::InvalidConfidenceLevel(_))
        ));
    }

    #[test]
    fn test_validation_invalid_tolerance() {
        let result = RegressionOptions::builder().tolerance(0.0).build();
        assert!(matches!(result, Err(OptionsError::InvalidTolerance(_))));
    }

    #[test]
    fn test_validation_invalid_max_iterations() {
        let result = RegressionOptions::builder().max_iterations(0).build();
        assert!(matches!(result, Err(OptionsError::InvalidMaxIterations(_))));
    }
}
