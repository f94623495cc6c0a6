//! Immutable in-memory table of named numeric columns.

use faer::{Col, Mat};

/// An immutable dataset: rows are observations, columns are named numeric
/// attributes. Categorical two-level columns are stored as 0/1.
///
/// All derivations (`drop_rows`, `with_column`) produce a new `Dataset`;
/// nothing is mutated in place.
#[derive(Debug, Clone)]
pub struct Dataset {
    names: Vec<String>,
    values: Mat<f64>,
}

impl Dataset {
    /// Create a dataset from column names and a values matrix.
    ///
    /// # Panics
    /// Panics if `names.len()` does not match the column count of `values`.
    pub fn new(names: Vec<String>, values: Mat<f64>) -> Self {
        assert_eq!(
            names.len(),
            values.ncols(),
            "column names must match matrix width"
        );
        Self { names, values }
    }

    /// Number of rows (observations).
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (attributes).
    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    /// Column names in storage order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Index of a column by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Copy of a column by name.
    pub fn column(&self, name: &str) -> Option<Col<f64>> {
        let j = self.index_of(name)?;
        Some(Col::from_fn(self.n_rows(), |i| self.values[(i, j)]))
    }

    /// Single value at (row, column name).
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        let j = self.index_of(name)?;
        Some(self.values[(row, j)])
    }

    /// Build a design matrix from the named columns, in the given order.
    ///
    /// Returns `None` if any name is unknown.
    pub fn select(&self, names: &[&str]) -> Option<Mat<f64>> {
        let indices: Vec<usize> = names
            .iter()
            .map(|name| self.index_of(name))
            .collect::<Option<Vec<_>>>()?;

        Some(Mat::from_fn(self.n_rows(), indices.len(), |i, j| {
            self.values[(i, indices[j])]
        }))
    }

    /// New dataset with the given row indices removed.
    ///
    /// Indices outside the row range are ignored; duplicates are harmless.
    pub fn drop_rows(&self, rows: &[usize]) -> Dataset {
        let mut drop = vec![false; self.n_rows()];
        for &r in rows {
            if r < self.n_rows() {
                drop[r] = true;
            }
        }

        let keep: Vec<usize> = (0..self.n_rows()).filter(|&i| !drop[i]).collect();
        let values = Mat::from_fn(keep.len(), self.n_cols(), |i, j| self.values[(keep[i], j)]);

        Dataset {
            names: self.names.clone(),
            values,
        }
    }

    /// New dataset with an extra column appended.
    ///
    /// # Panics
    /// Panics if the column length does not match the row count.
    pub fn with_column(&self, name: &str, column: &Col<f64>) -> Dataset {
        assert_eq!(
            column.nrows(),
            self.n_rows(),
            "appended column must match row count"
        );

        let mut names = self.names.clone();
        names.push(name.to_string());

        let p = self.n_cols();
        let values = Mat::from_fn(self.n_rows(), p + 1, |i, j| {
            if j < p {
                self.values[(i, j)]
            } else {
                column[i]
            }
        });

        Dataset { names, values }
    }
}
