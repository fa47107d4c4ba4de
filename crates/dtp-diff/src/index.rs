//! Per-source index used to resolve references while diffing.
//!
//! Every JSON file of a source is deep-merged into one tree. Wrapped files
//! keep their wrapper; files under a `base/` folder are also folded into the
//! `base` namespace so unwrapped base files can be referenced.

use dtp_merge::{is_deprecated_path, is_metadata_file, merge_groups, TokenSource};
use dtp_resolve::follow;
use dtp_types::reference::{references, strip_namespace};
use dtp_types::{format_scalar, Group, OklchColor, Tier, TokenTree};
use serde_json::Value;
use tracing::debug;

use crate::error::DiffResult;

/// A reference resolved for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedColor {
    /// What to render: an `oklch(L,C,H,A)` string, a literal color, or the
    /// original text when nothing resolved.
    pub color: String,
    /// The reference path without its namespace, or the literal text.
    pub label: String,
}

impl ResolvedColor {
    fn literal(text: &str) -> Self {
        Self {
            color: text.to_string(),
            label: text.to_string(),
        }
    }
}

/// All tokens of one source, merged.
#[derive(Clone, Debug, Default)]
pub struct ReferenceIndex {
    root: Group,
}

impl ReferenceIndex {
    pub fn from_group(root: Group) -> Self {
        Self { root }
    }

    /// Load and merge every JSON file of `source`. Built once per run.
    ///
    /// Deprecated files load first so main tokens win on a shared path.
    pub fn build(source: &dyn TokenSource) -> DiffResult<Self> {
        let (deprecated, main): (Vec<String>, Vec<String>) = source
            .list_files()?
            .into_iter()
            .filter(|file| !is_metadata_file(file))
            .partition(|file| is_deprecated_path(file));

        let mut root = Group::new();
        let mut files = 0usize;
        for file in deprecated.into_iter().chain(main) {
            let tree = source.read_tree(&file)?;
            let under_base = file.starts_with("base/") || file.contains("/base/");
            let folded = (under_base && tree.wrapper_key() != Some(Tier::Base.as_str()))
                .then(|| TokenTree::wrap(Tier::Base, tree.root().clone()));
            root = merge_groups(root, tree.into_root());
            if let Some(folded) = folded {
                root = merge_groups(root, folded.into_root());
            }
            files += 1;
        }
        debug!(source = %source.describe(), files, "built reference index");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Resolve the first reference in `text` to a displayable color.
    ///
    /// A second reference, if present, supplies the alpha of the first.
    /// Text without references, and references that do not resolve, pass
    /// through as literal text.
    pub fn resolve(&self, text: &str) -> DiffResult<ResolvedColor> {
        let refs: Vec<&str> = references(text).collect();
        let Some(first) = refs.first() else {
            return Ok(ResolvedColor::literal(text));
        };
        let label = strip_namespace(first).to_string();
        let Some(resolution) = follow(&self.root, first)? else {
            return Ok(ResolvedColor {
                color: text.to_string(),
                label,
            });
        };

        let value = resolution.token.value();
        let color = match OklchColor::from_value(value).ok().flatten() {
            Some(color) => {
                let color = match refs.get(1) {
                    Some(alpha_ref) => match self.alpha(alpha_ref)? {
                        Some(alpha) => color.with_alpha(alpha),
                        None => color,
                    },
                    None => color,
                };
                color.css_with_commas()
            }
            None => format_scalar(value),
        };
        Ok(ResolvedColor { color, label })
    }

    fn alpha(&self, path: &str) -> DiffResult<Option<Value>> {
        Ok(follow(&self.root, path)?.and_then(|resolution| {
            match resolution.token.value() {
                alpha @ (Value::Number(_) | Value::String(_)) => Some(alpha.clone()),
                _ => None,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtp_merge::InMemoryTokenSource;
    use dtp_resolve::ResolveError;
    use serde_json::json;

    use crate::error::DiffError;

    fn source() -> InMemoryTokenSource {
        InMemoryTokenSource::new()
            .with_json(
                "base/palette.json",
                json!({"palette": {"blue": {"100": {"value": {"colorSpace": "oklch", "components": [0.9, 0.05, 250], "alpha": 1}}}}}),
            )
            .with_json("base/opacity.json", json!({"base": {"opacity": {"half": {"value": 0.5}}}}))
            .with_json(
                "sys/color/light.json",
                json!({"sys": {"color": {
                    "primary": {"value": "{palette.blue.100}", "type": "color"},
                    "loop": {"value": "{sys.color.loop}"}
                }}}),
            )
            .with_json("$themes.json", json!([]))
    }

    #[test]
    fn resolves_through_aliases_and_base_folding() {
        let index = ReferenceIndex::build(&source()).unwrap();
        let resolved = index.resolve("{sys.color.primary}").unwrap();
        assert_eq!(resolved.color, "oklch(0.9,0.05,250,1)");
        assert_eq!(resolved.label, "color.primary");

        let resolved = index.resolve("{base.palette.blue.100}").unwrap();
        assert_eq!(resolved.color, "oklch(0.9,0.05,250,1)");
        assert_eq!(resolved.label, "palette.blue.100");
    }

    #[test]
    fn second_reference_supplies_alpha() {
        let index = ReferenceIndex::build(&source()).unwrap();
        let resolved = index
            .resolve("oklch(from {palette.blue.100} l c h / {opacity.half})")
            .unwrap();
        assert_eq!(resolved.color, "oklch(0.9,0.05,250,0.5)");
    }

    #[test]
    fn unresolved_and_literal_text_pass_through() {
        let index = ReferenceIndex::build(&source()).unwrap();
        let resolved = index.resolve("{palette.red.500}").unwrap();
        assert_eq!(resolved.color, "{palette.red.500}");
        assert_eq!(resolved.label, "palette.red.500");

        let resolved = index.resolve("#ffffff").unwrap();
        assert_eq!(resolved, ResolvedColor::literal("#ffffff"));
    }

    #[test]
    fn main_tokens_win_over_deprecated() {
        let source = InMemoryTokenSource::new()
            .with_json("base/size.json", json!({"base": {"size": {"xs": {"value": 4}}}}))
            .with_json(
                "deprecated/base/size.json",
                json!({"base": {"size": {"xs": {"value": 2}, "xl": {"value": 24}}}}),
            );
        let index = ReferenceIndex::build(&source).unwrap();
        assert_eq!(index.resolve("{base.size.xs}").unwrap().color, "4");
        assert_eq!(index.resolve("{size.xl}").unwrap().color, "24");
    }

    #[test]
    fn cyclic_references_are_errors() {
        let index = ReferenceIndex::build(&source()).unwrap();
        assert!(matches!(
            index.resolve("{sys.color.loop}"),
            Err(DiffError::Reference(ResolveError::CyclicReference { .. }))
        ));
    }

    #[test]
    fn missing_source_is_an_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let source = dtp_merge::FsTokenSource::new(dir.path().join("missing"));
        let index = ReferenceIndex::build(&source).unwrap();
        assert!(index.root().is_empty());
        assert_eq!(index.resolve("{a.b}").unwrap().color, "{a.b}");
    }
}
