use dtp_types::{OklchColor, Token};
use serde_json::Value;

use crate::error::{NormalizeError, NormalizeResult};
use crate::stage::{StageContext, TokenStage};

pub const FALLBACK_KEY: &str = "fallback";

/// Flattens a structured OKLCH value into `oklch(L C H / A)`, keeping the
/// source object's hex as `fallback`.
pub struct ColorStage;

impl TokenStage for ColorStage {
    fn name(&self) -> &str {
        "color"
    }

    fn apply(&self, token: &mut Token, context: &StageContext<'_>) -> NormalizeResult<()> {
        let color = OklchColor::from_value(token.value()).map_err(|source| {
            NormalizeError::MalformedColor {
                path: context.path.to_string(),
                source,
            }
        })?;
        let Some(color) = color else {
            return Ok(());
        };
        token.set_value(Value::String(color.css()));
        if let Some(hex) = color.hex {
            token.insert(FALLBACK_KEY, Value::String(hex));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{is_base, run};
    use dtp_resolve::ReferenceResolver;
    use serde_json::json;

    #[test]
    fn flattens_oklch_and_keeps_hex_fallback() {
        let token = run(
            &ColorStage,
            "primary",
            json!({
                "value": {"colorSpace": "oklch", "components": [0.5, 0.1, 45], "alpha": 1, "hex": "#a05a2c"},
                "type": "color"
            }),
        );
        assert_eq!(token.value(), &json!("oklch(0.5 0.1 45 / 1)"));
        assert_eq!(token.get_str("fallback"), Some("#a05a2c"));
    }

    #[test]
    fn alpha_defaults_and_missing_hex() {
        let token = run(
            &ColorStage,
            "primary",
            json!({"value": {"colorSpace": "oklch", "components": [0.5, 0.1, 45], "alpha": null}}),
        );
        assert_eq!(token.value(), &json!("oklch(0.5 0.1 45 / 1)"));
        assert!(!token.contains("fallback"));
    }

    #[test]
    fn non_oklch_values_are_untouched() {
        let token = run(&ColorStage, "primary", json!({"value": "#fff"}));
        assert_eq!(token.value(), &json!("#fff"));
    }

    #[test]
    fn missing_components_is_an_error_with_path() {
        let classifier = is_base;
        let resolver = ReferenceResolver::new(&classifier);
        let context = StageContext {
            key: "fg",
            path: "sys.color.fg",
            resolver: &resolver,
            rem_base: 16.0,
        };
        let mut token = Token::new(json!({"colorSpace": "oklch"}));
        match ColorStage.apply(&mut token, &context) {
            Err(NormalizeError::MalformedColor { path, .. }) => assert_eq!(path, "sys.color.fg"),
            other => panic!("expected malformed color, got {other:?}"),
        }
    }
}
