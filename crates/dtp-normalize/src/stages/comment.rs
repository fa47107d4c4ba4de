use std::sync::LazyLock;

use dtp_types::Token;
use regex::Regex;
use serde_json::Value;

use crate::error::NormalizeResult;
use crate::stage::{StageContext, TokenStage};

static NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline pattern is valid"));

/// Moves `description` to a single-line `comment`.
pub struct CommentStage;

impl TokenStage for CommentStage {
    fn name(&self) -> &str {
        "comment"
    }

    fn apply(&self, token: &mut Token, _context: &StageContext<'_>) -> NormalizeResult<()> {
        let comment = match token.get_str("description") {
            Some(text) if !text.is_empty() => NEWLINES.replace_all(text, "; ").into_owned(),
            _ => return Ok(()),
        };
        token.remove("description");
        token.insert("comment", Value::String(comment));
        Ok(())
    }
}
