//! Error types for normalization.

use dtp_types::TypeError;

/// Errors that can occur while normalizing a tree.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// A structured color object without a usable `components` list.
    #[error("malformed color at {path}: {source}")]
    MalformedColor { path: String, source: TypeError },

    /// The rem base cannot be used as a divisor.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for normalize results.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cause() {
        let errors = [
            NormalizeError::MalformedColor {
                path: "sys.fg".into(),
                source: TypeError::MalformedColor("missing components list".into()),
            },
            NormalizeError::Config("rem base must be positive".into()),
        ];
        for err in errors {
            let message = err.to_string();
            match err {
                NormalizeError::MalformedColor { .. } => {
                    assert!(message.contains("sys.fg"));
                    assert!(message.contains("missing components list"));
                }
                NormalizeError::Config(_) => assert!(message.starts_with("configuration error")),
            }
        }
    }
}
