//! Error types for the sensi-speci library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum SespError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column(s) '{column}' not found in {table} table (columns found: {available:?})")]
    ColumnNotFound {
        column: String,
        table: String,
        available: Vec<String>,
    },

    #[error("No samples in the {group} group for phenotype column '{column}'")]
    EmptyGroup { group: String, column: String },

    #[error("Invalid threshold {name} = {value}: must be in [0, 1]")]
    InvalidThreshold { name: String, value: f64 },

    #[error("Samples not found in presence/absence matrix: {samples:?}")]
    SampleNotFound { samples: Vec<String> },

    #[error("Duplicate sample '{0}' in phenotype table")]
    DuplicateSample(String),

    #[error("Invalid presence/absence value '{value}' at row {row}, column {column}")]
    InvalidCell {
        value: String,
        row: usize,
        column: String,
    },

    #[error("Invalid numeric value '{value}' at row {row}, column '{column}'")]
    InvalidNumber {
        value: String,
        row: usize,
        column: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SespError {
    pub(crate) fn column_not_found(column: &str, table: &str, available: &[String]) -> Self {
        Self::ColumnNotFound {
            column: column.to_string(),
            table: table.to_string(),
            available: available.to_vec(),
        }
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, SespError>;
