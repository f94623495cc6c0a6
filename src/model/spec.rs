//! Declarative description of a regression model over a [`Dataset`].

use crate::data::Dataset;
use faer::{Col, Mat};
use thiserror::Error;

/// Errors from building a design matrix.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown column {0:?}")]
    UnknownColumn(String),

    #[error("model has no predictor terms")]
    EmptyModel,
}

/// A single predictor term.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A column used as-is.
    Main(String),
    /// Product of two columns.
    Interaction(String, String),
    /// A column raised to a fixed exponent, added alongside the original
    /// (Box-Tidwell style power term).
    Power { column: String, exponent: f64 },
}

impl Term {
    /// Human-readable label, used in summaries and reports.
    pub fn label(&self) -> String {
        match self {
            Term::Main(name) => name.clone(),
            Term::Interaction(a, b) => format!("{a}:{b}"),
            Term::Power { column, exponent } => format!("{column}^{exponent:.3}"),
        }
    }
}

/// The response column plus an ordered list of predictor terms.
///
/// A `ModelSpec` is a value; deriving a new model (adding an interaction,
/// appending a power term) produces a new spec and leaves the original
/// untouched.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    response: String,
    terms: Vec<Term>,
}

impl ModelSpec {
    /// Start a spec for the given response column.
    pub fn response(name: &str) -> Self {
        Self {
            response: name.to_string(),
            terms: Vec::new(),
        }
    }

    /// Spec with every column other than the response as a main effect.
    pub fn all_predictors(data: &Dataset, response: &str) -> Self {
        let mut spec = Self::response(response);
        for name in data.names() {
            if name != response {
                spec.terms.push(Term::Main(name.clone()));
            }
        }
        spec
    }

    /// Add a main-effect term.
    pub fn with_main(mut self, name: &str) -> Self {
        self.terms.push(Term::Main(name.to_string()));
        self
    }

    /// Add a pairwise interaction term.
    pub fn with_interaction(mut self, a: &str, b: &str) -> Self {
        self.terms
            .push(Term::Interaction(a.to_string(), b.to_string()));
        self
    }

    /// Add an explicit power term for a column (the original column stays).
    pub fn with_power(mut self, column: &str, exponent: f64) -> Self {
        self.terms.push(Term::Power {
            column: column.to_string(),
            exponent,
        });
        self
    }

    /// Spec with the named main effect removed (other terms untouched).
    pub fn without_main(&self, name: &str) -> Self {
        let terms = self
            .terms
            .iter()
            .filter(|t| !matches!(t, Term::Main(n) if n == name))
            .cloned()
            .collect();
        Self {
            response: self.response.clone(),
            terms,
        }
    }

    /// The response column name.
    pub fn response_name(&self) -> &str {
        &self.response
    }

    /// The predictor terms, in design-matrix order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Names of the main-effect columns in this spec.
    pub fn main_effect_names(&self) -> Vec<&str> {
        self.terms
            .iter()
            .filter_map(|t| match t {
                Term::Main(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Build the design matrix, response vector, and term labels.
    pub fn design(&self, data: &Dataset) -> Result<(Mat<f64>, Col<f64>, Vec<String>), ModelError> {
        if self.terms.is_empty() {
            return Err(ModelError::EmptyModel);
        }

        let y = data
            .column(&self.response)
            .ok_or_else(|| ModelError::UnknownColumn(self.response.clone()))?;

        let n = data.n_rows();
        let mut columns: Vec<Col<f64>> = Vec::with_capacity(self.terms.len());
        let mut labels = Vec::with_capacity(self.terms.len());

        for term in &self.terms {
            let col = match term {
                Term::Main(name) => data
                    .column(name)
                    .ok_or_else(|| ModelError::UnknownColumn(name.clone()))?,
                Term::Interaction(a, b) => {
                    let ca = data
                        .column(a)
                        .ok_or_else(|| ModelError::UnknownColumn(a.clone()))?;
                    let cb = data
                        .column(b)
                        .ok_or_else(|| ModelError::UnknownColumn(b.clone()))?;
                    Col::from_fn(n, |i| ca[i] * cb[i])
                }
                Term::Power { column, exponent } => {
                    let c = data
                        .column(column)
                        .ok_or_else(|| ModelError::UnknownColumn(column.clone()))?;
                    let e = *exponent;
                    Col::from_fn(n, |i| c[i].powf(e))
                }
            };
            columns.push(col);
            labels.push(term.label());
        }

        let x = Mat::from_fn(n, columns.len(), |i, j| columns[j][i]);
        Ok((x, y, labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Dataset {
        let values = Mat::from_fn(5, 3, |i, j| (i + 1) as f64 * (j + 1) as f64);
        Dataset::new(
            vec!["y".to_string(), "a".to_string(), "b".to_string()],
            values,
        )
    }

    #[test]
    fn test_design_main_effects() {
        let spec = ModelSpec::response("y").with_main("a").with_main("b");
        let (x, y, labels) = spec.design(&data()).unwrap();

        assert_eq!(x.ncols(), 2);
        assert_eq!(y.nrows(), 5);
        assert_eq!(labels, vec!["a", "b"]);
        assert!((x[(2, 0)] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_interaction_column_is_product() {
        let spec = ModelSpec::response("y").with_interaction("a", "b");
        let (x, _, labels) = spec.design(&data()).unwrap();

        // a = 2(i+1), b = 3(i+1)
        assert!((x[(1, 0)] - 4.0 * 6.0).abs() < 1e-12);
        assert_eq!(labels[0], "a:b");
    }

    #[test]
    fn test_power_term() {
        let spec = ModelSpec::response("y").with_main("a").with_power("a", 2.0);
        let (x, _, labels) = spec.design(&data()).unwrap();

        assert!((x[(2, 1)] - 36.0).abs() < 1e-12);
        assert!(labels[1].starts_with("a^"));
    }

    #[test]
    fn test_unknown_column_errors() {
        let spec = ModelSpec::response("y").with_main("nope");
        assert!(matches!(
            spec.design(&data()),
            Err(ModelError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_all_predictors_skips_response() {
        let spec = ModelSpec::all_predictors(&data(), "y");
        assert_eq!(spec.terms().len(), 2);
    }

    #[test]
    fn test_without_main() {
        let spec = ModelSpec::response("y").with_main("a").with_main("b");
        let smaller = spec.without_main("a");
        assert_eq!(smaller.main_effect_names(), vec!["b"]);
        assert_eq!(spec.terms().len(), 2);
    }
}
