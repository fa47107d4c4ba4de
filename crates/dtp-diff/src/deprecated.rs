//! Consistency of the `deprecated/` folder structure.

use dtp_merge::{is_deprecated_path, main_counterpart, token_files, FileScope, TokenSource};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::DiffResult;

const DEPRECATED_FLAG: &str = "deprecated";

/// A token flagged deprecated but still living in a main file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MisplacedToken {
    pub filename: String,
    pub token: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeprecationReport {
    /// Deprecated files without a main file at the same relative path.
    pub orphaned_files: Vec<String>,
    pub deprecated_in_main: Vec<MisplacedToken>,
}

impl DeprecationReport {
    pub fn is_empty(&self) -> bool {
        self.orphaned_files.is_empty() && self.deprecated_in_main.is_empty()
    }
}

pub fn check_deprecated(source: &dyn TokenSource) -> DiffResult<DeprecationReport> {
    let mut report = DeprecationReport::default();
    for filename in token_files(source, FileScope::All)? {
        if is_deprecated_path(&filename) {
            if !source.exists(&main_counterpart(&filename)) {
                report.orphaned_files.push(filename);
            }
            continue;
        }
        let tree = source.read_tree(&filename)?;
        for (token, leaf) in tree.root().tokens() {
            if leaf.get(DEPRECATED_FLAG) == Some(&Value::Bool(true)) {
                report.deprecated_in_main.push(MisplacedToken {
                    filename: filename.clone(),
                    token,
                });
            }
        }
    }
    info!(
        orphaned = report.orphaned_files.len(),
        misplaced = report.deprecated_in_main.len(),
        "deprecation check complete"
    );
    Ok(report)
}
