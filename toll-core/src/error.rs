//! Error types for toll-core.

use thiserror::Error;

/// Result type alias for toll-core operations.
pub type Result<T> = std::result::Result<T, TollError>;

/// Errors that can occur while building, unrolling or filtering distance data.
#[derive(Error, Debug)]
pub enum TollError {
    /// A record is missing one of its required fields.
    #[error("Missing field '{field}' in record {row}")]
    MissingField {
        /// Zero-based position of the record in its input sequence.
        row: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A record carries a negative or non-finite distance.
    #[error("Invalid distance {value} in record {row}: must be finite and non-negative")]
    InvalidDistance {
        /// Zero-based position of the record in its input sequence.
        row: usize,
        /// The rejected value.
        value: f64,
    },

    /// The reference location has no rows where it is the start.
    #[error("Reference location not found: {reference}")]
    ReferenceNotFound {
        /// Debug rendering of the reference identifier.
        reference: String,
    },

    /// Matrix labels and cell rows disagree in size.
    #[error("Matrix dimension mismatch: expected {expected} entries, found {found}")]
    DimensionMismatch {
        /// Number of labels.
        expected: usize,
        /// Number of entries actually supplied.
        found: usize,
    },

    /// The same identifier labels more than one matrix row.
    #[error("Duplicate location in matrix labels: {id}")]
    DuplicateLocation {
        /// Debug rendering of the repeated identifier.
        id: String,
    },

    /// Threshold configuration is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration problem.
        message: String,
    },

    /// JSON parsing error for edge records.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error for threshold configuration.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
