//! Error types for the diff crate.

use dtp_merge::MergeError;
use dtp_resolve::ResolveError;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Reading or parsing a token file failed.
    #[error("source error: {0}")]
    Source(#[from] MergeError),

    /// A reference chain is cyclic.
    #[error("reference error: {0}")]
    Reference(#[from] ResolveError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
