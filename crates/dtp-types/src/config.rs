use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::tier::Platform;

/// Directory roots every component works against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootPaths {
    /// Working token sources.
    pub tokens: PathBuf,
    /// Frozen snapshot the working tree is diffed against.
    pub baseline: PathBuf,
    /// Where export artifacts are written.
    pub export: PathBuf,
}

impl Default for RootPaths {
    fn default() -> Self {
        Self {
            tokens: PathBuf::from("tokens"),
            baseline: PathBuf::from("tokens-base"),
            export: PathBuf::from("export"),
        }
    }
}

impl RootPaths {
    /// Resolve relative roots against `root`. Absolute roots are kept.
    pub fn rebase(&self, root: &Path) -> Self {
        Self {
            tokens: root.join(&self.tokens),
            baseline: root.join(&self.baseline),
            export: root.join(&self.export),
        }
    }
}

/// Settings for a build or diff run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: RootPaths,
    /// Platforms `brand`/`sys` exports are produced for.
    pub platforms: Vec<Platform>,
    /// Pixel size of `1rem` for `fontSize` conversion.
    pub rem_base: f64,
    /// Fold deprecated tokens into the main export (main wins on conflict).
    pub include_deprecated_in_main: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            paths: RootPaths::default(),
            platforms: Platform::ALL.to_vec(),
            rem_base: 16.0,
            include_deprecated_in_main: true,
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, TypeError> {
        let config: Self = toml::from_str(text).map_err(|e| TypeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, TypeError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        if !(self.rem_base.is_finite() && self.rem_base > 0.0) {
            return Err(TypeError::Config(format!(
                "rem_base must be a positive number, got {}",
                self.rem_base
            )));
        }
        if self.platforms.is_empty() {
            return Err(TypeError::Config("at least one platform is required".into()));
        }
        Ok(())
    }
}
