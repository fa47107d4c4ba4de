//! Where token files come from.
//!
//! Paths handed out and accepted by a [`TokenSource`] are relative to the
//! source root and always `/`-separated, e.g. `sys/color/light.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use dtp_types::TokenTree;
use serde_json::Value;
use tracing::trace;
use walkdir::WalkDir;

use crate::error::{MergeError, MergeResult};

/// A readable collection of token files.
///
/// Invariants:
/// - `list_files` returns `.json` files only, sorted lexicographically.
/// - A source whose root does not exist is empty, not an error.
pub trait TokenSource: Send + Sync {
    /// Where the files live, for log lines.
    fn describe(&self) -> String;

    /// Every `.json` file under the root.
    fn list_files(&self) -> MergeResult<Vec<String>>;

    /// Whether a file exists.
    fn exists(&self, path: &str) -> bool;

    /// Raw file contents.
    fn read_text(&self, path: &str) -> MergeResult<String>;

    /// Read and parse a token file.
    fn read_tree(&self, path: &str) -> MergeResult<TokenTree> {
        let text = self.read_text(path)?;
        trace!(source = %self.describe(), path, "parsing token file");
        TokenTree::parse(&text).map_err(|source| MergeError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Read a file, treating a missing one as an empty tree.
    fn read_tree_or_empty(&self, path: &str) -> MergeResult<TokenTree> {
        if self.exists(path) {
            self.read_tree(path)
        } else {
            Ok(TokenTree::new())
        }
    }
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

/// Token files in a directory tree.
#[derive(Clone, Debug)]
pub struct FsTokenSource {
    root: PathBuf,
}

impl FsTokenSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &str) -> PathBuf {
        path.split('/').fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl TokenSource for FsTokenSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn list_files(&self) -> MergeResult<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| MergeError::Walk {
                path: self.describe(),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if relative.ends_with(".json") {
                files.push(relative);
            }
        }
        files.sort();
        Ok(files)
    }

    fn exists(&self, path: &str) -> bool {
        self.absolute(path).is_file()
    }

    fn read_text(&self, path: &str) -> MergeResult<String> {
        std::fs::read_to_string(self.absolute(path)).map_err(|source| MergeError::Io {
            path: path.to_string(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// In memory
// ---------------------------------------------------------------------------

/// Token files held in memory. Intended for tests and embedding.
pub struct InMemoryTokenSource {
    files: RwLock<BTreeMap<String, String>>,
}

impl InMemoryTokenSource {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
        }
    }

    /// Add or replace a file with raw text.
    pub fn insert(&self, path: impl Into<String>, text: impl Into<String>) {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.into(), text.into());
    }

    /// Add or replace a file with a JSON document.
    pub fn insert_json(&self, path: impl Into<String>, value: &Value) {
        self.insert(path, value.to_string());
    }

    /// Builder form of [`insert_json`](Self::insert_json).
    pub fn with_json(self, path: impl Into<String>, value: Value) -> Self {
        self.insert_json(path, &value);
        self
    }

    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryTokenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for InMemoryTokenSource {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn list_files(&self) -> MergeResult<Vec<String>> {
        let files = self.files.read().expect("lock poisoned");
        Ok(files.keys().filter(|k| k.ends_with(".json")).cloned().collect())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().expect("lock poisoned").contains_key(path)
    }

    fn read_text(&self, path: &str) -> MergeResult<String> {
        self.files
            .read()
            .expect("lock poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| MergeError::NotFound(path.to_string()))
    }
}
