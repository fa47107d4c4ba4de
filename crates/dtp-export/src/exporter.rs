//! Platform filtering, provenance comments, and artifact locations.

use dtp_types::{Group, Platform, Tier, TokenNode, TokenTree, Variant};
use serde_json::Value;
use tracing::info;

use crate::error::ExportResult;
use crate::sink::TokenSink;

pub const COMMENT_KEY: &str = "_comment";
pub const DESCRIPTION_KEY: &str = "_description";
pub const GENERATED_COMMENT: &str = "File is auto-generated, do not edit it manually.";
pub const DEPRECATED_DESCRIPTION: &str =
    "File contains deprecated tokens that are no longer supported and will be removed in the future.";

/// `sys` sub-keys the main web export leaves out.
pub const WEB_EXCLUDED: [(&str, &[&str]); 2] =
    [("space", &["half", "x5", "x14"]), ("shape", &["x4", "x6"])];

/// Relative location of an artifact below the export root.
///
/// Base is platform independent and lives at the top; brand and sys are
/// written once per platform.
pub fn artifact_location(tier: Tier, variant: Variant, platform: Option<Platform>) -> String {
    let file = format!("{}.json", tier.as_str());
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    if variant.is_deprecated() {
        parts.push("deprecated");
    }
    if tier != Tier::Base {
        if let Some(platform) = platform {
            parts.push(platform.as_str());
        }
    }
    parts.push(&file);
    parts.join("/")
}

/// Prefix a tree with the generated-file notice (and the deprecation notice
/// for deprecated artifacts). Provenance keys come first.
pub fn with_provenance(tree: TokenTree, variant: Variant) -> TokenTree {
    let mut root = Group::new();
    root.insert(COMMENT_KEY, TokenNode::Literal(Value::from(GENERATED_COMMENT)));
    if variant.is_deprecated() {
        root.insert(
            DESCRIPTION_KEY,
            TokenNode::Literal(Value::from(DEPRECATED_DESCRIPTION)),
        );
    }
    for (key, node) in tree.into_root().into_entries() {
        root.insert(key, node);
    }
    TokenTree::from_group(root)
}

/// Remove leaves a platform does not support. Only the main web export is
/// filtered.
pub fn filter_platform(mut tree: TokenTree, platform: Platform, variant: Variant) -> TokenTree {
    if platform != Platform::Web || variant.is_deprecated() {
        return tree;
    }
    let Some(sys) = tree
        .root_mut()
        .get_mut(Tier::Sys.as_str())
        .and_then(TokenNode::as_group_mut)
    else {
        return tree;
    };
    for (group, keys) in WEB_EXCLUDED {
        if let Some(group) = sys.get_mut(group).and_then(TokenNode::as_group_mut) {
            for key in keys {
                group.remove(key);
            }
        }
    }
    tree
}

/// One written artifact.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Artifact {
    pub tier: Tier,
    pub variant: Variant,
    pub platform: Option<Platform>,
    pub location: String,
    pub tokens: usize,
}

/// Writes normalized tier trees for every configured platform.
pub struct PlatformExporter {
    platforms: Vec<Platform>,
}

impl PlatformExporter {
    pub fn new(platforms: Vec<Platform>) -> Self {
        Self { platforms }
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Write `tree` for `tier`/`variant`: once for base, once per platform
    /// otherwise.
    pub fn export(
        &self,
        sink: &dyn TokenSink,
        tier: Tier,
        variant: Variant,
        tree: &TokenTree,
    ) -> ExportResult<Vec<Artifact>> {
        let targets: Vec<Option<Platform>> = if tier == Tier::Base {
            vec![None]
        } else {
            self.platforms.iter().copied().map(Some).collect()
        };

        let mut artifacts = Vec::with_capacity(targets.len());
        for platform in targets {
            let filtered = match platform {
                Some(platform) => filter_platform(tree.clone(), platform, variant),
                None => tree.clone(),
            };
            let tokens = filtered.root().tokens().len();
            let location = artifact_location(tier, variant, platform);
            sink.write(&location, &with_provenance(filtered, variant))?;
            info!(
                tier = %tier,
                variant = %variant,
                location = %location,
                tokens,
                "exported tokens"
            );
            artifacts.push(Artifact {
                tier,
                variant,
                platform,
                location,
                tokens,
            });
        }
        Ok(artifacts)
    }
}
