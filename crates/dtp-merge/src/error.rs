//! Error types for the merge crate.

use dtp_types::TypeError;

/// Errors that can occur while loading and merging token files.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A token file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// A token file is not valid JSON or not an object.
    #[error("failed to parse {path}: {source}")]
    Parse { path: String, source: TypeError },

    /// A requested token file does not exist in the source.
    #[error("token file not found: {0}")]
    NotFound(String),

    /// Directory traversal failed.
    #[error("failed to walk {path}: {message}")]
    Walk { path: String, message: String },
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
