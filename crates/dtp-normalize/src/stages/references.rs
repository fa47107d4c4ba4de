use dtp_types::Token;
use serde_json::Value;

use crate::error::NormalizeResult;
use crate::stage::{StageContext, TokenStage};

/// Text fields whose references are qualified after the value.
pub const TEXT_FIELDS: [&str; 3] = ["fallback", "description", "deprecatedComment"];

/// Qualifies references in the token value.
pub struct ValueReferencesStage;

impl TokenStage for ValueReferencesStage {
    fn name(&self) -> &str {
        "value-references"
    }

    fn apply(&self, token: &mut Token, context: &StageContext<'_>) -> NormalizeResult<()> {
        let qualified = context.resolver.qualify_value(token.value());
        token.set_value(qualified);
        Ok(())
    }
}

/// Qualifies references in `fallback`, `description` and `deprecatedComment`
/// when they are strings.
pub struct TextReferencesStage;

impl TokenStage for TextReferencesStage {
    fn name(&self) -> &str {
        "text-references"
    }

    fn apply(&self, token: &mut Token, context: &StageContext<'_>) -> NormalizeResult<()> {
        for field in TEXT_FIELDS {
            let qualified = match token.get_str(field) {
                Some(text) if !text.is_empty() => context.resolver.qualify_str(text),
                _ => continue,
            };
            token.insert(field, Value::String(qualified));
        }
        Ok(())
    }
}
