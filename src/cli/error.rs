//! CLI error types and conversions

use crate::archiver::ArchiveError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Archive build error
    #[error("archive error: {0}")]
    ArchiveError(#[from] ArchiveError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
