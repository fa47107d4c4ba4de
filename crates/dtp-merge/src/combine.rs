//! Gathering one tier's files into a single tree.

use dtp_types::{Group, Tier, TokenTree, Variant};
use tracing::debug;

use crate::error::MergeResult;
use crate::merge::merge_trees;
use crate::source::TokenSource;

/// Whether `path` is a file of `folder` for `tier`.
///
/// A folder matches itself as a file (`base` matches `base.json`) and any
/// path below it. Brand files live under a `brand/` folder and belong to the
/// brand tier only.
pub fn in_tier_folder(path: &str, folder: &str, tier: Tier) -> bool {
    let Some(rest) = path.strip_prefix(folder) else {
        return false;
    };
    if !(rest.starts_with('/') || rest.starts_with('.')) || !path.ends_with(".json") {
        return false;
    }
    let is_brand_file = path.contains("brand/");
    if tier == Tier::Brand {
        is_brand_file
    } else {
        !is_brand_file
    }
}

/// The files `combine_tokens` reads, in order.
pub fn tier_files(source: &dyn TokenSource, folder: &str, tier: Tier) -> MergeResult<Vec<String>> {
    Ok(source
        .list_files()?
        .into_iter()
        .filter(|path| in_tier_folder(path, folder, tier))
        .collect())
}

/// Flat accumulate: top-level keys of later groups replace earlier ones.
pub fn accumulate(groups: impl IntoIterator<Item = Group>) -> Group {
    let mut acc = Group::new();
    for group in groups {
        for (key, node) in group.into_entries() {
            acc.insert(key, node);
        }
    }
    acc
}

/// Combine every file of a tier folder into one tree wrapped under the tier.
///
/// Each file's `<tier>` wrapper is stripped before accumulating. The result
/// is empty (and unwrapped) when the folder holds no tokens.
pub fn combine_tokens(source: &dyn TokenSource, folder: &str, tier: Tier) -> MergeResult<TokenTree> {
    let files = tier_files(source, folder, tier)?;
    let mut groups = Vec::with_capacity(files.len());
    for file in &files {
        groups.push(source.read_tree(file)?.strip_wrapper(tier));
    }
    let combined = accumulate(groups);
    debug!(
        source = %source.describe(),
        folder,
        tier = %tier,
        files = files.len(),
        keys = combined.len(),
        "combined tier files"
    );
    if combined.is_empty() {
        Ok(TokenTree::new())
    } else {
        Ok(TokenTree::wrap(tier, combined))
    }
}

/// The main and deprecated trees of one tier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TierSources {
    pub main: TokenTree,
    pub deprecated: TokenTree,
}

impl TierSources {
    /// Combine both variants of `tier` from `source`.
    pub fn load(source: &dyn TokenSource, tier: Tier) -> MergeResult<Self> {
        Ok(Self {
            main: combine_tokens(source, &Variant::Main.source_folder(tier), tier)?,
            deprecated: combine_tokens(source, &Variant::Deprecated.source_folder(tier), tier)?,
        })
    }

    /// `merge(deprecated, main)`: every token of both, main winning.
    pub fn merged(&self) -> TokenTree {
        merge_trees(self.deprecated.clone(), self.main.clone())
    }

    /// The tree the main export is built from.
    pub fn main_export(&self, include_deprecated: bool) -> TokenTree {
        if include_deprecated {
            self.merged()
        } else {
            self.main.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.deprecated.is_empty()
    }
}
