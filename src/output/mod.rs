//! Archive output writers

pub mod npz;

/// Output writer errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Npz archive write error
    #[error("npz error: {0}")]
    NpzError(String),

    /// Value could not be represented in the on-disk schema
    #[error("conversion error: {0}")]
    ConversionError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
