use dtp_merge::MergeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// A write-path call to the source host failed.
    #[error("{operation} failed for {path}: {message}")]
    Remote {
        operation: String,
        path: String,
        message: String,
    },

    #[error("branch not found: {0}")]
    MissingBranch(String),

    #[error("artifact error: {0}")]
    Artifact(#[from] MergeError),

    #[error("invalid variables response: {0}")]
    Variables(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    pub fn remote(
        operation: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Remote {
            operation: operation.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
