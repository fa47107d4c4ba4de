//! Tokens and files present in the baseline but gone from the working tree.
//!
//! Unlike the visual diff this check walks the baseline. A main token that
//! moved to the deprecated counterpart of its file is not a removal.

use std::collections::HashSet;

use dtp_merge::{
    deprecated_counterpart, is_deprecated_path, token_files, FileScope, TokenSource,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::DiffResult;

/// Removed leaf paths of one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RemovedTokens {
    pub filename: String,
    pub tokens: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RemovalReport {
    /// Baseline main files with neither a main nor a deprecated successor.
    pub missing_files: Vec<String>,
    /// Main tokens found neither in the main file nor its deprecated counterpart.
    pub removed_main: Vec<RemovedTokens>,
    /// Deprecated tokens gone from the deprecated file.
    pub removed_deprecated: Vec<RemovedTokens>,
}

impl RemovalReport {
    pub fn is_empty(&self) -> bool {
        self.missing_files.is_empty()
            && self.removed_main.is_empty()
            && self.removed_deprecated.is_empty()
    }

    /// Total number of removed tokens.
    pub fn removed_count(&self) -> usize {
        self.removed_main
            .iter()
            .chain(&self.removed_deprecated)
            .map(|r| r.tokens.len())
            .sum()
    }
}

fn leaf_set(source: &dyn TokenSource, path: &str) -> DiffResult<HashSet<String>> {
    Ok(source
        .read_tree_or_empty(path)?
        .root()
        .leaf_paths()
        .into_iter()
        .collect())
}

/// Compare every baseline token file against the working source.
pub fn check_removals(
    new: &dyn TokenSource,
    baseline: &dyn TokenSource,
) -> DiffResult<RemovalReport> {
    let mut report = RemovalReport::default();

    for filename in token_files(baseline, FileScope::All)? {
        let previous = baseline.read_tree(&filename)?.root().leaf_paths();

        if is_deprecated_path(&filename) {
            let current = leaf_set(new, &filename)?;
            let tokens: Vec<String> = previous
                .into_iter()
                .filter(|path| !current.contains(path))
                .collect();
            if !tokens.is_empty() {
                report.removed_deprecated.push(RemovedTokens { filename, tokens });
            }
            continue;
        }

        let deprecated = deprecated_counterpart(&filename);
        if !new.exists(&filename) && !new.exists(&deprecated) {
            debug!(file = %filename, "file missing from working tree");
            report.missing_files.push(filename);
            continue;
        }
        let main = leaf_set(new, &filename)?;
        let moved = leaf_set(new, &deprecated)?;
        let tokens: Vec<String> = previous
            .into_iter()
            .filter(|path| !main.contains(path) && !moved.contains(path))
            .collect();
        if !tokens.is_empty() {
            report.removed_main.push(RemovedTokens { filename, tokens });
        }
    }

    info!(
        missing_files = report.missing_files.len(),
        removed_tokens = report.removed_count(),
        "removal check complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtp_merge::InMemoryTokenSource;
    use serde_json::json;

    fn baseline() -> InMemoryTokenSource {
        InMemoryTokenSource::new()
            .with_json(
                "sys/shape.json",
                json!({"_comment": "x", "sys": {"shape": {"xs": {"value": 2}, "sm": {"value": 4}, "md": {"value": 8}}}}),
            )
            .with_json("sys/space.json", json!({"sys": {"space": {"sm": {"value": 4}}}}))
            .with_json(
                "deprecated/sys/shape.json",
                json!({"sys": {"shape": {"old": {"value": 1}, "older": {"value": 0}}}}),
            )
    }

    #[test]
    fn unchanged_tree_reports_nothing() {
        let report = check_removals(&baseline(), &baseline()).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.removed_count(), 0);
    }

    #[test]
    fn moved_to_deprecated_is_not_removed() {
        let new = InMemoryTokenSource::new()
            .with_json("sys/shape.json", json!({"sys": {"shape": {"xs": {"value": 2}}}}))
            .with_json("sys/space.json", json!({"sys": {"space": {"sm": {"value": 4}}}}))
            .with_json(
                "deprecated/sys/shape.json",
                json!({"sys": {"shape": {"old": {"value": 1}, "older": {"value": 0}, "sm": {"value": 4}}}}),
            );
        let report = check_removals(&new, &baseline()).unwrap();
        assert!(report.missing_files.is_empty());
        assert_eq!(
            report.removed_main,
            vec![RemovedTokens {
                filename: "sys/shape.json".into(),
                tokens: vec!["_comment".into(), "sys.shape.md".into()],
            }]
        );
        assert!(report.removed_deprecated.is_empty());
    }

    #[test]
    fn missing_files_and_deprecated_removals() {
        let new = InMemoryTokenSource::new().with_json(
            "deprecated/sys/shape.json",
            json!({"sys": {"shape": {"old": {"value": 1}}}}),
        );
        let report = check_removals(&new, &baseline()).unwrap();
        assert_eq!(report.missing_files, vec!["sys/space.json".to_string()]);
        // The deprecated successor keeps sys/shape.json from counting as missing.
        assert_eq!(report.removed_main[0].filename, "sys/shape.json");
        assert_eq!(report.removed_main[0].tokens.len(), 4);
        assert_eq!(
            report.removed_deprecated,
            vec![RemovedTokens {
                filename: "deprecated/sys/shape.json".into(),
                tokens: vec!["sys.shape.older".into()],
            }]
        );
    }
}
