use dtp_types::{format_f64, Token};
use serde_json::Value;

use crate::error::NormalizeResult;
use crate::stage::{StageContext, TokenStage};

const FONT_SIZE_KEY: &str = "fontSize";

/// Converts a numeric `fontSize` value in pixels to `rem`.
pub struct FontSizeStage;

impl TokenStage for FontSizeStage {
    fn name(&self) -> &str {
        "font-size"
    }

    fn apply(&self, token: &mut Token, context: &StageContext<'_>) -> NormalizeResult<()> {
        if context.key != FONT_SIZE_KEY {
            return Ok(());
        }
        if let Some(px) = token.value().as_f64() {
            let rem = format!("{}rem", format_f64(px / context.rem_base));
            token.set_value(Value::String(rem));
        }
        Ok(())
    }
}
