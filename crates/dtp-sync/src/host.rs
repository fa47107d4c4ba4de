//! The source-hosting service exported tokens are synced into.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{SyncError, SyncResult};
use crate::types::{Branch, FileUpdate, PullRequest, RemoteFile};

/// Thin, non-retrying wrapper over a repository hosting API.
///
/// Read-path calls report an expected absence as `Ok(None)`; write-path
/// failures surface as [`SyncError::Remote`].
#[async_trait]
pub trait SourceHost: Send + Sync {
    async fn get_file_content(&self, path: &str, git_ref: &str) -> SyncResult<Option<RemoteFile>>;
    async fn update_file_content(&self, update: &FileUpdate) -> SyncResult<()>;
    async fn list_branches(&self) -> SyncResult<Vec<Branch>>;
    async fn create_ref(&self, branch: &str, sha: &str) -> SyncResult<()>;
    async fn update_ref(&self, branch: &str, sha: &str, force: bool) -> SyncResult<()>;
    async fn create_pull_request(&self, request: &PullRequest) -> SyncResult<()>;
}

// ---------------------------------------------------------------------------
// In memory
// ---------------------------------------------------------------------------

#[derive(Default)]
struct HostState {
    heads: BTreeMap<String, String>,
    files: BTreeMap<String, BTreeMap<String, RemoteFile>>,
    updates: Vec<FileUpdate>,
    pull_requests: Vec<PullRequest>,
    failing: BTreeSet<String>,
    next_sha: u64,
}

impl HostState {
    fn mint_sha(&mut self) -> String {
        self.next_sha += 1;
        format!("{:040x}", self.next_sha)
    }

    fn fail_if_requested(&self, operation: &str, path: &str) -> SyncResult<()> {
        if self.failing.contains(operation) {
            return Err(SyncError::remote(operation, path, "injected failure"));
        }
        Ok(())
    }

    fn files_at(&self, sha: &str) -> BTreeMap<String, RemoteFile> {
        self.heads
            .iter()
            .find(|(_, head)| head.as_str() == sha)
            .and_then(|(name, _)| self.files.get(name))
            .cloned()
            .unwrap_or_default()
    }
}

/// A repository held in memory, one file map per branch.
///
/// Every file update is a new commit on its branch. Intended for tests.
pub struct InMemorySourceHost {
    state: RwLock<HostState>,
}

impl InMemorySourceHost {
    /// A repository with a single branch.
    pub fn new(default_branch: &str) -> Self {
        let mut state = HostState::default();
        let sha = state.mint_sha();
        state.heads.insert(default_branch.to_string(), sha);
        state.files.insert(default_branch.to_string(), BTreeMap::new());
        Self {
            state: RwLock::new(state),
        }
    }

    /// Commit a file to `branch` without recording an update. Creates the
    /// branch if needed.
    pub async fn put_file(&self, branch: &str, path: &str, content: impl Into<String>) {
        let mut state = self.state.write().await;
        let sha = state.mint_sha();
        let commit = state.mint_sha();
        state.files.entry(branch.to_string()).or_default().insert(
            path.to_string(),
            RemoteFile {
                content: content.into(),
                sha,
            },
        );
        state.heads.insert(branch.to_string(), commit);
    }

    /// Make every later call of `operation` (e.g. `"create_pull_request"`) fail.
    pub async fn fail_on(&self, operation: &str) {
        self.state.write().await.failing.insert(operation.to_string());
    }

    pub async fn file(&self, branch: &str, path: &str) -> Option<RemoteFile> {
        let state = self.state.read().await;
        state.files.get(branch).and_then(|files| files.get(path)).cloned()
    }

    pub async fn head(&self, branch: &str) -> Option<String> {
        self.state.read().await.heads.get(branch).cloned()
    }

    pub async fn updates(&self) -> Vec<FileUpdate> {
        self.state.read().await.updates.clone()
    }

    pub async fn pull_requests(&self) -> Vec<PullRequest> {
        self.state.read().await.pull_requests.clone()
    }
}

#[async_trait]
impl SourceHost for InMemorySourceHost {
    async fn get_file_content(&self, path: &str, git_ref: &str) -> SyncResult<Option<RemoteFile>> {
        let state = self.state.read().await;
        let file = state.files.get(git_ref).and_then(|files| files.get(path)).cloned();
        if file.is_none() {
            info!(path, git_ref, "file does not exist on the source host");
        }
        Ok(file)
    }

    async fn update_file_content(&self, update: &FileUpdate) -> SyncResult<()> {
        let mut state = self.state.write().await;
        state.fail_if_requested("update_file_content", &update.path)?;
        if !state.heads.contains_key(&update.branch) {
            return Err(SyncError::remote(
                "update_file_content",
                &update.path,
                format!("no branch {}", update.branch),
            ));
        }
        let current = state
            .files
            .get(&update.branch)
            .and_then(|files| files.get(&update.path))
            .map(|file| file.sha.clone());
        if current != update.sha {
            return Err(SyncError::remote(
                "update_file_content",
                &update.path,
                "sha does not match the current file",
            ));
        }

        let file_sha = state.mint_sha();
        let commit_sha = state.mint_sha();
        state.files.entry(update.branch.clone()).or_default().insert(
            update.path.clone(),
            RemoteFile {
                content: update.content.clone(),
                sha: file_sha,
            },
        );
        state.heads.insert(update.branch.clone(), commit_sha);
        state.updates.push(update.clone());
        Ok(())
    }

    async fn list_branches(&self) -> SyncResult<Vec<Branch>> {
        let state = self.state.read().await;
        state.fail_if_requested("list_branches", "")?;
        Ok(state
            .heads
            .iter()
            .map(|(name, sha)| Branch {
                name: name.clone(),
                sha: sha.clone(),
            })
            .collect())
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> SyncResult<()> {
        let mut state = self.state.write().await;
        state.fail_if_requested("create_ref", branch)?;
        if state.heads.contains_key(branch) {
            return Err(SyncError::remote("create_ref", branch, "reference already exists"));
        }
        let files = state.files_at(sha);
        state.heads.insert(branch.to_string(), sha.to_string());
        state.files.insert(branch.to_string(), files);
        Ok(())
    }

    async fn update_ref(&self, branch: &str, sha: &str, force: bool) -> SyncResult<()> {
        let mut state = self.state.write().await;
        state.fail_if_requested("update_ref", branch)?;
        if !state.heads.contains_key(branch) {
            return Err(SyncError::remote("update_ref", branch, "reference does not exist"));
        }
        if !force {
            return Err(SyncError::remote("update_ref", branch, "update is not a fast-forward"));
        }
        let files = state.files_at(sha);
        state.heads.insert(branch.to_string(), sha.to_string());
        state.files.insert(branch.to_string(), files);
        Ok(())
    }

    async fn create_pull_request(&self, request: &PullRequest) -> SyncResult<()> {
        let mut state = self.state.write().await;
        state.fail_if_requested("create_pull_request", &request.head)?;
        if state
            .pull_requests
            .iter()
            .any(|pr| pr.head == request.head && pr.base == request.base)
        {
            return Err(SyncError::remote(
                "create_pull_request",
                &request.head,
                "a pull request already exists",
            ));
        }
        state.pull_requests.push(request.clone());
        Ok(())
    }
}
