use dtp_resolve::ReferenceResolver;
use dtp_types::Token;

use crate::error::NormalizeResult;

// ---------------------------------------------------------------------------
// StageContext
// ---------------------------------------------------------------------------

/// What a stage knows about the token it is transforming.
pub struct StageContext<'a> {
    /// The token's own key, e.g. `fontSize`.
    pub key: &'a str,
    /// Dotted path from the tree root.
    pub path: &'a str,
    /// Qualifies references against the run's base index.
    pub resolver: &'a ReferenceResolver<'a>,
    /// Pixel size of `1rem`.
    pub rem_base: f64,
}

// ---------------------------------------------------------------------------
// TokenStage trait
// ---------------------------------------------------------------------------

/// A single transform in the normalizer pipeline.
///
/// Stages run in order on every token. Each receives the token being built
/// and mutates it in place; the tree the token came from is never touched.
pub trait TokenStage: Send + Sync {
    /// Name used in logs and errors (e.g. "font-size", "color").
    fn name(&self) -> &str;

    /// Transform one token.
    fn apply(&self, token: &mut Token, context: &StageContext<'_>) -> NormalizeResult<()>;
}
