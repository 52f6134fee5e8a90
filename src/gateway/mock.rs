//! Mock gateway implementation for deterministic testing
//!
//! Stores branches and tags in memory, records every call, and allows
//! configuring failure scenarios per operation.
//!
//! # Example
//!
//! ```
//! use git_release::gateway::{MockGateway, RepositoryGateway};
//! use git_release::domain::RepoId;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let gateway = MockGateway::new()
//!     .with_branch("develop", "abc123")
//!     .with_tags(["v1.2.3"]);
//!
//! let repo = RepoId::new("org", "service");
//! let branch = gateway
//!     .get_branch(&repo, "develop", &CancellationToken::new())
//!     .await
//!     .unwrap();
//! assert_eq!(branch.commit_sha, "abc123");
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::domain::{RepoId, TagRef};
use crate::error::GatewayError;
use crate::gateway::{
    BranchInfo, CreatePullRequest, GitRef, PrState, PullRequest, RepoInfo, RepositoryGateway,
};

/// Mock gateway for testing
///
/// Thread-safe via internal `Arc<Mutex<...>>`; clones share state.
#[derive(Debug, Clone)]
pub struct MockGateway {
    inner: Arc<Mutex<MockGatewayInner>>,
}

#[derive(Debug)]
struct MockGatewayInner {
    repository_exists: bool,
    branches: HashMap<String, String>,
    tags: Vec<TagRef>,
    next_pr_number: u64,
    fail_get_repository: Option<GatewayError>,
    fail_list_tags: Option<GatewayError>,
    fail_create_branch: Option<GatewayError>,
    fail_pull_request: Option<GatewayError>,
    list_tags_delay: Option<Duration>,
    pull_request_delay: Option<Duration>,
    calls: Vec<GatewayCall>,
}

/// Recorded call for test verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    GetRepository {
        repo: RepoId,
    },
    GetBranch {
        branch: String,
    },
    ListTagRefs,
    CreateBranchRef {
        branch: String,
        from_sha: String,
    },
    CreatePullRequest {
        head: String,
        base: String,
        title: String,
    },
}

impl GatewayCall {
    /// Returns true for calls that change remote state
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            GatewayCall::CreateBranchRef { .. } | GatewayCall::CreatePullRequest { .. }
        )
    }
}

impl MockGateway {
    /// Create a mock with an existing, empty repository
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockGatewayInner {
                repository_exists: true,
                branches: HashMap::new(),
                tags: Vec::new(),
                next_pr_number: 1,
                fail_get_repository: None,
                fail_list_tags: None,
                fail_create_branch: None,
                fail_pull_request: None,
                list_tags_delay: None,
                pull_request_delay: None,
                calls: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockGatewayInner> {
        // a panicking test thread must not hide the recorded calls
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the repository lookup answer not-found
    pub fn without_repository(self) -> Self {
        self.lock().repository_exists = false;
        self
    }

    /// Add a branch with its head commit
    pub fn with_branch(self, name: impl Into<String>, sha: impl Into<String>) -> Self {
        self.lock().branches.insert(name.into(), sha.into());
        self
    }

    /// Add tags by short name; each is stored as `refs/tags/<name>`
    pub fn with_tags<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut inner = self.lock();
            for name in names {
                let name = name.into();
                let sha = format!("sha-{}", name);
                inner
                    .tags
                    .push(TagRef::new(format!("refs/tags/{}", name), sha));
            }
        }
        self
    }

    pub fn fail_get_repository(self, err: GatewayError) -> Self {
        self.lock().fail_get_repository = Some(err);
        self
    }

    pub fn fail_list_tags(self, err: GatewayError) -> Self {
        self.lock().fail_list_tags = Some(err);
        self
    }

    pub fn fail_create_branch(self, err: GatewayError) -> Self {
        self.lock().fail_create_branch = Some(err);
        self
    }

    pub fn fail_pull_request(self, err: GatewayError) -> Self {
        self.lock().fail_pull_request = Some(err);
        self
    }

    /// Delay tag listing; the delay honours cancellation
    pub fn delay_list_tags(self, delay: Duration) -> Self {
        self.lock().list_tags_delay = Some(delay);
        self
    }

    /// Delay pull request creation; the delay honours cancellation
    pub fn delay_pull_request(self, delay: Duration) -> Self {
        self.lock().pull_request_delay = Some(delay);
        self
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    /// Calls that changed remote state
    pub fn mutating_calls(&self) -> Vec<GatewayCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.is_mutating())
            .collect()
    }

    /// Returns true if a branch with this name exists
    pub fn has_branch(&self, name: &str) -> bool {
        self.lock().branches.contains_key(name)
    }

    fn record(&self, call: GatewayCall) {
        self.lock().calls.push(call);
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn check_cancelled(cancel: &CancellationToken) -> Result<(), GatewayError> {
    if cancel.is_cancelled() {
        Err(GatewayError::Cancelled)
    } else {
        Ok(())
    }
}

async fn wait(delay: Option<Duration>, cancel: &CancellationToken) -> Result<(), GatewayError> {
    if let Some(delay) = delay {
        tokio::select! {
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
    Ok(())
}

#[async_trait]
impl RepositoryGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_repository(
        &self,
        repo: &RepoId,
        cancel: &CancellationToken,
    ) -> Result<RepoInfo, GatewayError> {
        self.record(GatewayCall::GetRepository { repo: repo.clone() });
        check_cancelled(cancel)?;

        let inner = self.lock();
        if let Some(err) = inner.fail_get_repository.clone() {
            return Err(err);
        }
        if !inner.repository_exists {
            return Err(GatewayError::NotFound("Not Found".to_string()));
        }

        Ok(RepoInfo {
            full_name: repo.to_string(),
            default_branch: None,
            url: None,
        })
    }

    async fn get_branch(
        &self,
        _repo: &RepoId,
        branch: &str,
        cancel: &CancellationToken,
    ) -> Result<BranchInfo, GatewayError> {
        self.record(GatewayCall::GetBranch {
            branch: branch.to_string(),
        });
        check_cancelled(cancel)?;

        self.lock()
            .branches
            .get(branch)
            .map(|sha| BranchInfo {
                name: branch.to_string(),
                commit_sha: sha.clone(),
            })
            .ok_or_else(|| GatewayError::NotFound("Branch not found".to_string()))
    }

    async fn list_tag_refs(
        &self,
        _repo: &RepoId,
        cancel: &CancellationToken,
    ) -> Result<Vec<TagRef>, GatewayError> {
        self.record(GatewayCall::ListTagRefs);
        check_cancelled(cancel)?;

        let delay = self.lock().list_tags_delay;
        wait(delay, cancel).await?;

        let inner = self.lock();
        match inner.fail_list_tags.clone() {
            Some(err) => Err(err),
            None => Ok(inner.tags.clone()),
        }
    }

    async fn create_branch_ref(
        &self,
        _repo: &RepoId,
        branch: &str,
        from_sha: &str,
        cancel: &CancellationToken,
    ) -> Result<GitRef, GatewayError> {
        self.record(GatewayCall::CreateBranchRef {
            branch: branch.to_string(),
            from_sha: from_sha.to_string(),
        });
        check_cancelled(cancel)?;

        let mut inner = self.lock();
        if let Some(err) = inner.fail_create_branch.clone() {
            return Err(err);
        }
        if inner.branches.contains_key(branch) {
            return Err(GatewayError::Api {
                status: 422,
                message: "Reference already exists".to_string(),
            });
        }

        inner
            .branches
            .insert(branch.to_string(), from_sha.to_string());
        Ok(GitRef {
            name: format!("refs/heads/{}", branch),
            sha: from_sha.to_string(),
        })
    }

    async fn create_pull_request(
        &self,
        repo: &RepoId,
        request: &CreatePullRequest,
        cancel: &CancellationToken,
    ) -> Result<PullRequest, GatewayError> {
        self.record(GatewayCall::CreatePullRequest {
            head: request.head.clone(),
            base: request.base.clone(),
            title: request.title.clone(),
        });
        check_cancelled(cancel)?;

        let delay = self.lock().pull_request_delay;
        wait(delay, cancel).await?;

        let mut inner = self.lock();
        if let Some(err) = inner.fail_pull_request.clone() {
            return Err(err);
        }

        let number = inner.next_pr_number;
        inner.next_pr_number += 1;
        Ok(PullRequest {
            number,
            url: format!("https://github.com/{}/pull/{}", repo, number),
            state: PrState::Open,
            head: request.head.clone(),
            base: request.base.clone(),
            title: request.title.clone(),
        })
    }
}
