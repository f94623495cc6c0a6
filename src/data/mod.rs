//! Tabular dataset support and the bundled college admissions data.

mod college;
mod table;

pub use college::{College, DataError};
pub use table::Dataset;
