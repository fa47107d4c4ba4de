use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token tree root must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("unknown tier: {0}")]
    UnknownTier(String),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("malformed oklch color: {0}")]
    MalformedColor(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
