//! Error types for record log operations.

use thiserror::Error;

use crate::record::RecordId;

/// Errors surfaced by the store, the exporter and persistence.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LogError {
    /// A required field is missing or malformed.
    #[error("Validation failed for `{field}`: {message}")]
    Validation { field: String, message: String },

    /// Update target does not exist.
    #[error("Record {id} not found")]
    NotFound { id: RecordId },

    /// Add with an explicit id that is already present.
    #[error("Record {id} already exists")]
    DuplicateId { id: RecordId },

    /// A value could not be stringified.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Local persistence failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl LogError {
    pub fn validation(field: &str, message: &str) -> Self {
        LogError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for LogError {
    fn from(err: serde_json::Error) -> Self {
        LogError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for LogError {
    fn from(err: csv::Error) -> Self {
        LogError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LogError>;
