use dtp_types::Token;

use crate::error::NormalizeResult;
use crate::stage::{StageContext, TokenStage};

pub const EXTENSIONS_KEY: &str = "$extensions";

/// Drops design-tool vendor metadata.
pub struct ExtensionsStage;

impl TokenStage for ExtensionsStage {
    fn name(&self) -> &str {
        "extensions"
    }

    fn apply(&self, token: &mut Token, _context: &StageContext<'_>) -> NormalizeResult<()> {
        token.remove(EXTENSIONS_KEY);
        Ok(())
    }
}
