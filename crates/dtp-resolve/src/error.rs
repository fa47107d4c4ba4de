//! Error types for reference resolution.

use thiserror::Error;

/// Errors that can occur while resolving references.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A chain of references leads back to a token already visited.
    #[error("cyclic reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },
}

/// Convenience alias for resolve results.
pub type ResolveResult<T> = Result<T, ResolveError>;
