//! Repository host gateway
//!
//! This module provides:
//! - The `RepositoryGateway` trait the release workflow talks to
//! - HTTP client foundation with cancellation support
//! - GitHub REST API implementation
//! - In-memory mock implementation for tests
//!
//! Every call takes the workflow's `CancellationToken`; a cancelled call
//! resolves to `GatewayError::Cancelled`. Calls are never retried.

mod client;
mod github;
mod mock;

pub use client::HttpClient;
pub use github::{GitHubGateway, DEFAULT_API_BASE};
pub use mock::{GatewayCall, MockGateway};

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tokio_util::sync::CancellationToken;

use crate::domain::{RepoId, TagRef};
use crate::error::GatewayError;

/// Repository metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoInfo {
    /// `owner/name`
    pub full_name: String,
    /// Default branch, when reported by the host
    pub default_branch: Option<String>,
    /// Web URL, when reported by the host
    pub url: Option<String>,
}

/// A branch and its head commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchInfo {
    pub name: String,
    pub commit_sha: String,
}

/// A git reference created on the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitRef {
    /// Full reference name (e.g. `refs/heads/release-v1.2.4`)
    pub name: String,
    pub sha: String,
}

/// Request to open a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePullRequest {
    /// Branch with the changes
    pub head: String,
    /// Branch to merge into
    pub base: String,
    pub title: String,
}

/// Pull request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrState {
    Open,
    Closed,
    Merged,
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrState::Open => write!(f, "open"),
            PrState::Closed => write!(f, "closed"),
            PrState::Merged => write!(f, "merged"),
        }
    }
}

/// Pull request returned by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    pub number: u64,
    /// Web URL for viewing
    pub url: String,
    pub state: PrState,
    pub head: String,
    pub base: String,
    pub title: String,
}

/// Narrow interface over the repository host
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Get the gateway name (e.g., "github")
    fn name(&self) -> &'static str;

    /// Fetch repository metadata
    async fn get_repository(
        &self,
        repo: &RepoId,
        cancel: &CancellationToken,
    ) -> Result<RepoInfo, GatewayError>;

    /// Fetch a branch and its head commit
    async fn get_branch(
        &self,
        repo: &RepoId,
        branch: &str,
        cancel: &CancellationToken,
    ) -> Result<BranchInfo, GatewayError>;

    /// List every tag reference in the repository
    async fn list_tag_refs(
        &self,
        repo: &RepoId,
        cancel: &CancellationToken,
    ) -> Result<Vec<TagRef>, GatewayError>;

    /// Create `refs/heads/<branch>` pointing at `from_sha`
    async fn create_branch_ref(
        &self,
        repo: &RepoId,
        branch: &str,
        from_sha: &str,
        cancel: &CancellationToken,
    ) -> Result<GitRef, GatewayError>;

    /// Open a pull request
    async fn create_pull_request(
        &self,
        repo: &RepoId,
        request: &CreatePullRequest,
        cancel: &CancellationToken,
    ) -> Result<PullRequest, GatewayError>;
}
