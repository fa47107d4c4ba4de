//! Token normalization for the design token pipeline.
//!
//! A [`Normalizer`] walks a merged tree and passes every token through an
//! ordered list of [`TokenStage`]s, producing a new tree:
//!
//! 1. `fontSize` pixels to `rem`
//! 2. OKLCH objects to `oklch(L C H / A)` with a hex `fallback`
//! 3. `$extensions` removed
//! 4. references in `value` namespace-qualified
//! 5. references in `fallback`, `description`, `deprecatedComment` qualified
//! 6. `description` moved to a single-line `comment`
//!
//! Color flattening runs before reference qualification so that a fallback
//! carrying references is qualified too.

pub mod cleanup;
pub mod error;
pub mod normalizer;
pub mod stage;
pub mod stages;

pub use cleanup::clean_tool_tokens;
pub use error::{NormalizeError, NormalizeResult};
pub use normalizer::{Normalizer, DEFAULT_REM_BASE};
pub use stage::{StageContext, TokenStage};
