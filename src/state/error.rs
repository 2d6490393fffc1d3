//! Error types for dataset loading

use crate::error::AppError;

/// Errors that can occur while loading the CDA dataset
#[derive(Debug, Clone, thiserror::Error)]
pub enum DatasetError {
    /// Backing file missing, unreadable or not a JSON array
    #[error("{0}")]
    Unavailable(String),

    /// A row failed strict typing; loading is aborted
    #[error("record {position} is invalid: {message}")]
    InvalidRecord { position: usize, message: String },

    /// More rows than a 32-bit position can address
    #[error("dataset has {0} records, more than can be indexed")]
    TooManyRecords(usize),
}

impl From<DatasetError> for AppError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::Unavailable(msg) => AppError::DataUnavailable(msg),
            err @ DatasetError::InvalidRecord { .. } => AppError::ValidationFailure(err.to_string()),
            err @ DatasetError::TooManyRecords(_) => AppError::ValidationFailure(err.to_string()),
        }
    }
}
