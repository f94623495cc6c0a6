//! Loader for the bundled college admissions reference dataset.

use crate::data::Dataset;
use faer::Mat;
use thiserror::Error;

/// The reference dataset, embedded at build time.
const COLLEGE_CSV: &str = include_str!("../../data/college.csv");

/// Expected column schema, in file order. `private` is the two-level
/// categorical column and is encoded Yes = 1, No = 0.
const COLUMNS: [&str; 18] = [
    "private",
    "apps",
    "accept",
    "enroll",
    "top10perc",
    "top25perc",
    "f_undergrad",
    "p_undergrad",
    "outstate",
    "room_board",
    "books",
    "personal",
    "phd",
    "terminal",
    "sf_ratio",
    "perc_alumni",
    "expend",
    "grad_rate",
];

/// Errors from loading the reference dataset.
#[derive(Debug, Error)]
pub enum DataError {
    /// The bundled asset is missing, empty, or its header does not match the
    /// expected schema.
    #[error("reference dataset unavailable: {0}")]
    DataUnavailable(String),

    /// A data row failed to parse.
    #[error("bad record at line {line}: {reason}")]
    BadRecord { line: usize, reason: String },
}

/// Accessor for the bundled college admissions dataset.
pub struct College;

impl College {
    /// Parse the bundled reference CSV into a [`Dataset`].
    ///
    /// The table has 777 rows and the 18 columns listed in the schema; the
    /// response of interest is `apps` (application count).
    pub fn load() -> Result<Dataset, DataError> {
        Self::parse(COLLEGE_CSV)
    }

    fn parse(text: &str) -> Result<Dataset, DataError> {
        if text.trim().is_empty() {
            return Err(DataError::DataUnavailable("embedded asset is empty".into()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| DataError::DataUnavailable(e.to_string()))?
            .clone();

        if headers.len() != COLUMNS.len() {
            return Err(DataError::DataUnavailable(format!(
                "expected {} columns, found {}",
                COLUMNS.len(),
                headers.len()
            )));
        }
        for (j, expected) in COLUMNS.iter().enumerate() {
            if &headers[j] != *expected {
                return Err(DataError::DataUnavailable(format!(
                    "column {j} is {:?}, expected {expected:?}",
                    &headers[j]
                )));
            }
        }

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let line = idx + 2; // header is line 1
            let record = record.map_err(|e| DataError::BadRecord {
                line,
                reason: e.to_string(),
            })?;

            let mut row = Vec::with_capacity(COLUMNS.len());
            for (j, field) in record.iter().enumerate() {
                let value = if j == 0 {
                    match field {
                        "Yes" => 1.0,
                        "No" => 0.0,
                        other => {
                            return Err(DataError::BadRecord {
                                line,
                                reason: format!("private must be Yes or No, got {other:?}"),
                            })
                        }
                    }
                } else {
                    field.parse::<f64>().map_err(|e| DataError::BadRecord {
                        line,
                        reason: format!("{}: {e}", COLUMNS[j]),
                    })?
                };
                row.push(value);
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(DataError::DataUnavailable(
                "embedded asset has no data rows".into(),
            ));
        }

        let values = Mat::from_fn(rows.len(), COLUMNS.len(), |i, j| rows[i][j]);
        Ok(Dataset::new(
            COLUMNS.iter().map(|s| s.to_string()).collect(),
            values,
        ))
    }

    /// Names of all predictor columns (everything except the response).
    pub fn predictor_names() -> Vec<&'static str> {
        COLUMNS.iter().copied().filter(|&c| c != "apps").collect()
    }

    /// Name of the response column.
    pub const RESPONSE: &'static str = "apps";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_shape() {
        let data = College::load().expect("bundled data loads");
        assert_eq!(data.n_rows(), 777);
        assert_eq!(data.n_cols(), 18);
    }

    #[test]
    fn test_private_is_binary() {
        let data = College::load().unwrap();
        let private = data.column("private").unwrap();
        assert!(private.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_counts_are_positive() {
        let data = College::load().unwrap();
        for name in ["apps", "accept", "enroll"] {
            let col = data.column(name).unwrap();
            assert!(col.iter().all(|&v| v > 0.0), "{name} must be positive");
        }
    }

    #[test]
    fn test_bad_header_rejected() {
        let err = College::parse("foo,bar\n1,2\n").unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable(_)));
    }

    #[test]
    fn test_bad_record_rejected() {
        let mut text = COLUMNS.join(",");
        text.push_str("\nMaybe,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,17\n");
        let err = College::parse(&text).unwrap_err();
        assert!(matches!(err, DataError::BadRecord { line: 2, .. }));
    }

    #[test]
    fn test_predictor_names_exclude_response() {
        let names = College::predictor_names();
        assert_eq!(names.len(), 17);
        assert!(!names.contains(&"apps"));
    }
}
