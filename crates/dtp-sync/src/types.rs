use std::collections::BTreeMap;

use dtp_types::Tier;
use serde::{Deserialize, Serialize};

/// A file read from the source host. `content` is decoded text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub content: String,
    pub sha: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    /// Head commit of the branch.
    pub sha: String,
}

/// A create-or-update of one file on a branch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUpdate {
    pub path: String,
    pub branch: String,
    pub message: String,
    pub content: String,
    /// Sha of the file being replaced; `None` creates the file.
    pub sha: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub base: String,
    pub head: String,
    pub title: String,
    pub body: String,
    pub maintainer_can_modify: bool,
}

/// The repository exported tokens are synced into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncTarget {
    pub owner: String,
    pub repo: String,
    pub default_branch: String,
    pub sync_branch: String,
    /// Remote path of each tier's config file.
    pub config_paths: BTreeMap<Tier, String>,
}

impl Default for SyncTarget {
    fn default() -> Self {
        let config_paths = Tier::ALL
            .iter()
            .map(|tier| (*tier, format!("tokens/{}.json", tier.as_str())))
            .collect();
        Self {
            owner: String::new(),
            repo: String::new(),
            default_branch: "main".into(),
            sync_branch: "chore/sync-tokens".into(),
            config_paths,
        }
    }
}

impl SyncTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Self::default()
        }
    }

    pub fn with_config_path(mut self, tier: Tier, path: impl Into<String>) -> Self {
        self.config_paths.insert(tier, path.into());
        self
    }

    /// `owner/repo`, for log lines.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn config_path(&self, tier: Tier) -> String {
        self.config_paths
            .get(&tier)
            .cloned()
            .unwrap_or_else(|| format!("tokens/{}.json", tier.as_str()))
    }
}

/// What a sync run did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub branch: String,
    /// Whether the sync branch had to be created.
    pub created_branch: bool,
    pub updated: Vec<Tier>,
    pub up_to_date: Vec<Tier>,
    pub pull_request: Option<PullRequest>,
}

impl SyncReport {
    pub fn has_changes(&self) -> bool {
        !self.updated.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_defaults_and_overrides() {
        let target = SyncTarget::new("canvas", "tokens")
            .with_config_path(Tier::Sys, "config/sys.json");
        assert_eq!(target.full_name(), "canvas/tokens");
        assert_eq!(target.default_branch, "main");
        assert_eq!(target.config_path(Tier::Base), "tokens/base.json");
        assert_eq!(target.config_path(Tier::Sys), "config/sys.json");
    }

    #[test]
    fn target_deserializes_with_defaults() {
        let target: SyncTarget =
            serde_json::from_str(r#"{"owner": "o", "repo": "r", "sync_branch": "sync"}"#).unwrap();
        assert_eq!(target.sync_branch, "sync");
        assert_eq!(target.default_branch, "main");
        assert_eq!(target.config_path(Tier::Brand), "tokens/brand.json");
    }
}
