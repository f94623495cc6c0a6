//! Model specification: which columns enter a fit, and in what form.

mod spec;

pub use spec::{ModelError, ModelSpec, Term};
