//! Push exported token artifacts to the source host and open a pull request.

use dtp_export::artifact_location;
use dtp_merge::TokenSource;
use dtp_types::{Platform, Tier, Variant};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{SyncError, SyncResult};
use crate::host::SourceHost;
use crate::types::{FileUpdate, PullRequest, SyncReport, SyncTarget};

pub const PULL_REQUEST_TITLE: &str = "chore: Sync Tokens Studio config 🤖";

pub const PULL_REQUEST_TEMPLATE: &str = "## Issue

<!-- Add an issue number and link the PR with a keyword: \"Fixes\", \"Resolves\", or \"Closes\" -->
<!-- Resolves #123 -->

## Summary

<!-- Give a brief description of what this PR does. -->

## Release Category

Web Tokens

### Release Note

Optional release note message. Add `⚠️ BREAKING CHANGES:` before message if it's a breaking change.
Changelog and release summaries will contain a pull request title. This section will add additional
notes under that title. This section is not a summary, but something extra to point out in release
notes. An example might be calling out breaking changes in a labs component or minor visual changes
that need visual regression updates. Remove this section if no additional release notes are
required.
";

/// Commit message for a tier's config update.
pub fn commit_message(tier: Tier) -> String {
    format!("chore: Sync {tier} tokens config")
}

/// Pretty JSON with a trailing newline, as committed to the host.
pub fn encode_config(value: &Value) -> SyncResult<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Syncs exported artifacts of changed tiers into a remote repository.
pub struct SyncWorkflow<'a> {
    host: &'a dyn SourceHost,
    target: SyncTarget,
    platform: Platform,
}

impl<'a> SyncWorkflow<'a> {
    pub fn new(host: &'a dyn SourceHost, target: SyncTarget) -> Self {
        Self {
            host,
            target,
            platform: Platform::Web,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn target(&self) -> &SyncTarget {
        &self.target
    }

    /// Sync `tiers`, reading artifacts from `artifacts` (an export root).
    ///
    /// Nothing is touched when `tiers` is empty. A pull request is opened
    /// only if at least one config changed.
    pub async fn run(&self, artifacts: &dyn TokenSource, tiers: &[Tier]) -> SyncResult<SyncReport> {
        let mut report = SyncReport {
            branch: self.target.sync_branch.clone(),
            ..SyncReport::default()
        };
        if tiers.is_empty() {
            info!("no changed tiers, nothing to sync");
            return Ok(report);
        }

        report.created_branch = self.ensure_sync_branch().await?;
        for &tier in tiers {
            if self.sync_tier(artifacts, tier).await? {
                report.updated.push(tier);
            } else {
                report.up_to_date.push(tier);
            }
        }

        if report.has_changes() {
            let request = PullRequest {
                base: self.target.default_branch.clone(),
                head: self.target.sync_branch.clone(),
                title: PULL_REQUEST_TITLE.to_string(),
                body: PULL_REQUEST_TEMPLATE.to_string(),
                maintainer_can_modify: true,
            };
            info!(
                repo = %self.target.full_name(),
                head = %request.head,
                base = %request.base,
                "creating pull request"
            );
            self.host.create_pull_request(&request).await?;
            report.pull_request = Some(request);
        }
        Ok(report)
    }

    /// Create the sync branch from the default branch head, or force it
    /// back onto that head. Returns whether the branch was created.
    pub async fn ensure_sync_branch(&self) -> SyncResult<bool> {
        let branches = self.host.list_branches().await?;
        let main = branches
            .iter()
            .find(|b| b.name == self.target.default_branch)
            .ok_or_else(|| SyncError::MissingBranch(self.target.default_branch.clone()))?;
        let exists = branches.iter().any(|b| b.name == self.target.sync_branch);
        if exists {
            self.host
                .update_ref(&self.target.sync_branch, &main.sha, true)
                .await?;
        } else {
            self.host.create_ref(&self.target.sync_branch, &main.sha).await?;
        }
        info!(branch = %self.target.sync_branch, created = !exists, "sync branch ready");
        Ok(!exists)
    }

    /// Update one tier's remote config if it differs from the artifact.
    /// Returns whether an update was committed.
    pub async fn sync_tier(&self, artifacts: &dyn TokenSource, tier: Tier) -> SyncResult<bool> {
        let location = artifact_location(tier, Variant::Main, Some(self.platform));
        let exported: Value = serde_json::from_str(&artifacts.read_text(&location)?)?;
        let path = self.target.config_path(tier);

        let remote = self
            .host
            .get_file_content(&path, &self.target.default_branch)
            .await?;
        if let Some(file) = &remote {
            match serde_json::from_str::<Value>(&file.content) {
                Ok(current) if current == exported => {
                    info!(%tier, path = %path, "tokens are up to date");
                    return Ok(false);
                }
                Ok(_) => {}
                Err(e) => warn!(%tier, path = %path, error = %e, "remote config is not valid JSON"),
            }
        }

        info!(%tier, path = %path, "updating tokens");
        let update = FileUpdate {
            path,
            branch: self.target.sync_branch.clone(),
            message: commit_message(tier),
            content: encode_config(&exported)?,
            sha: remote.map(|file| file.sha),
        };
        self.host.update_file_content(&update).await?;
        Ok(true)
    }
}
