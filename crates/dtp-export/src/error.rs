//! Error types for exporting and building.

use std::io;

use dtp_merge::MergeError;
use dtp_normalize::NormalizeError;
use dtp_types::TypeError;

/// Errors produced while building and writing export artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// An artifact could not be written.
    #[error("failed to write {path}: {source}")]
    Io { path: String, source: io::Error },

    /// An artifact could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] TypeError),

    /// Reading source tokens failed.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// Normalizing a tier failed.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Convenience alias for export results.
pub type ExportResult<T> = Result<T, ExportError>;
