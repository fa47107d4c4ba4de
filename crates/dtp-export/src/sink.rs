//! Where export artifacts go.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use dtp_types::TokenTree;
use tracing::debug;

use crate::error::{ExportError, ExportResult};

/// Persists an output tree at a named, `/`-separated relative location.
pub trait TokenSink: Send + Sync {
    fn describe(&self) -> String;

    /// Write `tree` as two-space indented JSON, replacing any previous file.
    fn write(&self, location: &str, tree: &TokenTree) -> ExportResult<()>;
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

/// Writes artifacts below a directory, creating folders as needed.
#[derive(Clone, Debug)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a location.
    pub fn path_of(&self, location: &str) -> PathBuf {
        location
            .split('/')
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl TokenSink for FsSink {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn write(&self, location: &str, tree: &TokenTree) -> ExportResult<()> {
        let path = self.path_of(location);
        let io_err = |source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = tree.to_json_pretty()?;
        fs::write(&path, json).map_err(io_err)?;
        debug!(path = %path.display(), "wrote artifact");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In memory
// ---------------------------------------------------------------------------

/// Keeps written artifacts in memory. Intended for tests and dry runs.
pub struct InMemorySink {
    files: RwLock<BTreeMap<String, TokenTree>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
        }
    }

    /// A copy of the artifact written at `location`.
    pub fn get(&self, location: &str) -> Option<TokenTree> {
        self.files.read().expect("lock poisoned").get(location).cloned()
    }

    /// Written locations, sorted.
    pub fn locations(&self) -> Vec<String> {
        self.files.read().expect("lock poisoned").keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSink for InMemorySink {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn write(&self, location: &str, tree: &TokenTree) -> ExportResult<()> {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(location.to_string(), tree.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fs_sink_creates_folders_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsSink::new(dir.path());
        let tree = TokenTree::from_value(json!({"_comment": "x", "base": {"unit": {"value": 8}}})).unwrap();
        sink.write("deprecated/web/sys.json", &tree).unwrap();

        let written = fs::read_to_string(dir.path().join("deprecated/web/sys.json")).unwrap();
        assert!(written.starts_with("{\n  \"_comment\": \"x\",\n  \"base\": {"));
        assert_eq!(TokenTree::parse(&written).unwrap(), tree);
    }

    #[test]
    fn memory_sink_keeps_latest_write() {
        let sink = InMemorySink::new();
        let first = TokenTree::from_value(json!({"a": 1})).unwrap();
        let second = TokenTree::from_value(json!({"a": 2})).unwrap();
        sink.write("base.json", &first).unwrap();
        sink.write("base.json", &second).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.get("base.json"), Some(second));
    }
}
