use dtp_resolve::{PathClassifier, ReferenceResolver};
use dtp_types::TokenTree;
use tracing::debug;

use crate::error::{NormalizeError, NormalizeResult};
use crate::stage::{StageContext, TokenStage};
use crate::stages::{
    ColorStage, CommentStage, ExtensionsStage, FontSizeStage, TextReferencesStage,
    ValueReferencesStage,
};

/// Default pixel size of `1rem`.
pub const DEFAULT_REM_BASE: f64 = 16.0;

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Runs every token of a tree through an ordered list of stages.
pub struct Normalizer {
    stages: Vec<Box<dyn TokenStage>>,
    rem_base: f64,
}

impl Normalizer {
    /// An empty pipeline. Use [`Self::add_stage`] or
    /// [`Self::with_default_stages`].
    pub fn new(rem_base: f64) -> NormalizeResult<Self> {
        if !(rem_base.is_finite() && rem_base > 0.0) {
            return Err(NormalizeError::Config(format!(
                "rem base must be a positive number, got {rem_base}"
            )));
        }
        Ok(Self {
            stages: Vec::new(),
            rem_base,
        })
    }

    /// The standard pipeline:
    /// font size -> color -> extensions -> value references ->
    /// text references -> comment
    pub fn with_default_stages(rem_base: f64) -> NormalizeResult<Self> {
        let mut normalizer = Self::new(rem_base)?;
        normalizer.add_stage(Box::new(FontSizeStage));
        normalizer.add_stage(Box::new(ColorStage));
        normalizer.add_stage(Box::new(ExtensionsStage));
        normalizer.add_stage(Box::new(ValueReferencesStage));
        normalizer.add_stage(Box::new(TextReferencesStage));
        normalizer.add_stage(Box::new(CommentStage));
        Ok(normalizer)
    }

    pub fn add_stage(&mut self, stage: Box<dyn TokenStage>) {
        self.stages.push(stage);
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage names in pipeline order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Produce a normalized copy of `tree`. `tree` itself is not modified.
    pub fn normalize(
        &self,
        tree: &TokenTree,
        classifier: &dyn PathClassifier,
    ) -> NormalizeResult<TokenTree> {
        let resolver = ReferenceResolver::new(classifier);
        let mut count = 0usize;
        let root = tree.root().try_map_tokens(|key, path, mut token| {
            let context = StageContext {
                key,
                path,
                resolver: &resolver,
                rem_base: self.rem_base,
            };
            for stage in &self.stages {
                stage.apply(&mut token, &context)?;
            }
            count += 1;
            Ok::<_, NormalizeError>(token)
        })?;
        debug!(tokens = count, stages = self.stages.len(), "normalized tree");
        Ok(TokenTree::from_group(root))
    }
}
