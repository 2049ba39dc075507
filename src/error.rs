//! Error types for FileShare.

use thiserror::Error;

/// Common error type for FileShare.
#[derive(Error, Debug)]
pub enum FileShareError {
    /// Record or content absent.
    ///
    /// This is an expected outcome (for example a share link opened against
    /// a registry that never received the upload), not a fault.
    #[error("{0} not found")]
    NotFound(String),

    /// The registry or blob storage could not be used.
    ///
    /// Covers an uninitialized store, an exhausted quota and refused access.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The uploaded file could not be read into memory.
    #[error("failed to read file: {0}")]
    ReadFailure(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Every database failure is reported as the store being unavailable.
impl From<sqlx::Error> for FileShareError {
    fn from(e: sqlx::Error) -> Self {
        FileShareError::StorageUnavailable(e.to_string())
    }
}

/// Result type alias for FileShare operations.
pub type Result<T> = std::result::Result<T, FileShareError>;
