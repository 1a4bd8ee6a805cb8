//! Error types for table validation

use thiserror::Error;

/// Failures raised while turning a raw table into validated client records.
///
/// Rows are reported 1-based, counting data rows only (the header is not a row).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("column '{column}', row {row}: cannot parse '{value}' as a number")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column '{column}', row {row}: value is missing")]
    MissingValue { column: String, row: usize },

    #[error("column '{column}', row {row}: value {value} must not be negative")]
    NegativeValue {
        column: String,
        row: usize,
        value: f64,
    },

    #[error("table error: {0}")]
    Table(#[from] polars::prelude::PolarsError),
}

impl DataError {
    /// Names of the missing columns when this is a schema failure.
    pub fn missing_columns(&self) -> Option<&[String]> {
        match self {
            DataError::MissingColumns { missing } => Some(missing),
            _ => None,
        }
    }
}
