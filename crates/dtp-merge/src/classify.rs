//! Which files under a token root are token files, and of what kind.

use std::fmt;

use crate::error::MergeResult;
use crate::source::TokenSource;

const DEPRECATED_SEGMENT: &str = "deprecated/";
const IGNORED_FILES: [&str; 2] = ["$metadata.json", "$themes.json"];

/// The kind of a token file, by location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenFileKind {
    /// Under `base/` or named `*base.json`.
    Base,
    /// The brand file, `*canvas.json`.
    Brand,
    /// Under `sys/color`.
    Color,
    /// Anything else under `sys/`.
    System,
}

impl fmt::Display for TokenFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Base => "base",
            Self::Brand => "brand",
            Self::Color => "color",
            Self::System => "system",
        };
        f.write_str(name)
    }
}

/// Which variant of files to select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileScope {
    #[default]
    All,
    /// Files outside any `deprecated/` folder.
    Main,
    /// Files inside a `deprecated/` folder.
    Deprecated,
}

impl FileScope {
    pub fn admits(&self, path: &str) -> bool {
        match self {
            Self::All => true,
            Self::Main => !is_deprecated_path(path),
            Self::Deprecated => is_deprecated_path(path),
        }
    }
}

/// Whether a relative path lies inside a `deprecated/` folder.
pub fn is_deprecated_path(path: &str) -> bool {
    path.contains(DEPRECATED_SEGMENT)
}

/// The main-variant counterpart of a deprecated path.
pub fn main_counterpart(path: &str) -> String {
    path.replacen(DEPRECATED_SEGMENT, "", 1)
}

/// The deprecated-variant counterpart of a main path.
pub fn deprecated_counterpart(path: &str) -> String {
    format!("{DEPRECATED_SEGMENT}{path}")
}

/// Whether a path is design-tool bookkeeping (`$metadata.json`,
/// `$themes.json`) rather than a token tree.
pub fn is_metadata_file(path: &str) -> bool {
    IGNORED_FILES.contains(&path)
}

/// Classify a relative path. `None` means it is not a token file.
pub fn classify(path: &str) -> Option<TokenFileKind> {
    if !path.ends_with(".json") || is_metadata_file(path) {
        return None;
    }
    if path.contains("/base/") || path.starts_with("base/") || path.ends_with("base.json") {
        Some(TokenFileKind::Base)
    } else if path.ends_with("canvas.json") {
        Some(TokenFileKind::Brand)
    } else if path.contains("sys/color") {
        Some(TokenFileKind::Color)
    } else if path.contains("sys/") && !path.contains("sys/brand") {
        Some(TokenFileKind::System)
    } else {
        None
    }
}

/// Every token file of `source` in `scope`, sorted.
pub fn token_files(source: &dyn TokenSource, scope: FileScope) -> MergeResult<Vec<String>> {
    Ok(source
        .list_files()?
        .into_iter()
        .filter(|path| scope.admits(path) && classify(path).is_some())
        .collect())
}
