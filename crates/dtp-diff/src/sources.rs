//! Visual diff of every token file of a working source against a baseline.

use dtp_merge::{token_files, FileScope, TokenSource};
use tracing::{debug, info};

use crate::error::DiffResult;
use crate::index::ReferenceIndex;
use crate::record::FileDiff;
use crate::tree_diff::TokenDiff;

/// Diff each token file of `new` against the file at the same relative path
/// in `baseline`. A file missing from the baseline is diffed against an
/// empty tree. Files without changes are left out of the result.
pub fn diff_sources(new: &dyn TokenSource, baseline: &dyn TokenSource) -> DiffResult<Vec<FileDiff>> {
    let new_index = ReferenceIndex::build(new)?;
    let baseline_index = ReferenceIndex::build(baseline)?;
    let differ = TokenDiff::new(&new_index, &baseline_index);

    let mut diffs = Vec::new();
    for filename in token_files(new, FileScope::All)? {
        let tree = new.read_tree(&filename)?;
        let previous = baseline.read_tree_or_empty(&filename)?;
        let records = differ.diff(&tree, &previous)?;
        if records.is_empty() {
            debug!(file = %filename, "no changes");
            continue;
        }
        info!(file = %filename, count = records.len(), "token changes found");
        diffs.push(FileDiff { filename, records });
    }
    Ok(diffs)
}
