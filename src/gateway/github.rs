//! GitHub REST API gateway
//!
//! Endpoints used:
//! - `GET  /repos/{owner}/{repo}`
//! - `GET  /repos/{owner}/{repo}/branches/{branch}`
//! - `GET  /repos/{owner}/{repo}/git/refs/tags` (paginated)
//! - `POST /repos/{owner}/{repo}/git/refs`
//! - `POST /repos/{owner}/{repo}/pulls`
//!
//! Path segments taken from input, such as branch names, are percent-encoded.

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{RepoId, TagRef};
use crate::error::GatewayError;
use crate::gateway::{
    BranchInfo, CreatePullRequest, GitRef, HttpClient, PrState, PullRequest, RepoInfo,
    RepositoryGateway,
};

/// Default GitHub API base URL
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Page size for reference listings (GitHub maximum)
const PER_PAGE: usize = 100;

/// Upper bound on pages fetched for one listing
const MAX_PAGES: usize = 100;

/// GitHub gateway
#[derive(Debug, Clone)]
pub struct GitHubGateway {
    client: HttpClient,
    api_base: Url,
    max_pages: usize,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    full_name: String,
    default_branch: Option<String>,
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubBranch {
    name: String,
    commit: GitHubCommit,
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    #[serde(rename = "ref")]
    name: String,
    object: GitHubObject,
}

#[derive(Debug, Deserialize)]
struct GitHubObject {
    sha: String,
}

#[derive(Debug, Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    name: &'a str,
    sha: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePullBody<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Debug, Deserialize)]
struct GitHubPullRequest {
    number: u64,
    html_url: String,
    state: String,
    #[serde(default)]
    merged: bool,
    title: String,
    head: GitHubPullRef,
    base: GitHubPullRef,
}

#[derive(Debug, Deserialize)]
struct GitHubPullRef {
    #[serde(rename = "ref")]
    name: String,
}

impl From<GitHubPullRequest> for PullRequest {
    fn from(pr: GitHubPullRequest) -> Self {
        let state = match (pr.state.as_str(), pr.merged) {
            (_, true) => PrState::Merged,
            ("closed", false) => PrState::Closed,
            _ => PrState::Open,
        };
        PullRequest {
            number: pr.number,
            url: pr.html_url,
            state,
            head: pr.head.name,
            base: pr.base.name,
            title: pr.title,
        }
    }
}

impl GitHubGateway {
    /// Create a gateway against an API base (public GitHub, Enterprise, tests)
    pub fn with_api_base(client: HttpClient, api_base: &str) -> Result<Self, GatewayError> {
        let api_base = match Url::parse(api_base) {
            Ok(url) if !url.cannot_be_a_base() => url,
            _ => return Err(GatewayError::InvalidUrl(api_base.to_string())),
        };

        Ok(Self {
            client,
            api_base,
            max_pages: MAX_PAGES,
        })
    }

    /// Limit the number of pages read for one listing
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Build URL for a repository endpoint, encoding each path segment
    fn repo_url(&self, repo: &RepoId, path: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // bases that cannot hold a path are rejected in `with_api_base`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
                .extend(path);
        }
        url
    }
}

#[async_trait]
impl RepositoryGateway for GitHubGateway {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn get_repository(
        &self,
        repo: &RepoId,
        cancel: &CancellationToken,
    ) -> Result<RepoInfo, GatewayError> {
        let url = self.repo_url(repo, &[]);
        let body: GitHubRepository = self.client.get_json(url.as_str(), cancel).await?;

        Ok(RepoInfo {
            full_name: body.full_name,
            default_branch: body.default_branch,
            url: body.html_url,
        })
    }

    async fn get_branch(
        &self,
        repo: &RepoId,
        branch: &str,
        cancel: &CancellationToken,
    ) -> Result<BranchInfo, GatewayError> {
        let url = self.repo_url(repo, &["branches", branch]);
        let body: GitHubBranch = self.client.get_json(url.as_str(), cancel).await?;

        Ok(BranchInfo {
            name: body.name,
            commit_sha: body.commit.sha,
        })
    }

    async fn list_tag_refs(
        &self,
        repo: &RepoId,
        cancel: &CancellationToken,
    ) -> Result<Vec<TagRef>, GatewayError> {
        let mut tags = Vec::new();

        for page in 1..=self.max_pages {
            let mut url = self.repo_url(repo, &["git", "refs", "tags"]);
            url.query_pairs_mut()
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());
            let refs: Vec<GitHubRef> = self.client.get_json(url.as_str(), cancel).await?;
            let fetched = refs.len();

            tags.extend(refs.into_iter().map(|r| TagRef::new(r.name, r.object.sha)));

            debug!(repo = %repo, page, fetched, "fetched tag refs page");
            if fetched < PER_PAGE {
                return Ok(tags);
            }
        }

        // a full last page means the listing may continue past the limit
        warn!(repo = %repo, pages = self.max_pages, "tag listing truncated");
        Err(GatewayError::Truncated {
            pages: self.max_pages,
        })
    }

    async fn create_branch_ref(
        &self,
        repo: &RepoId,
        branch: &str,
        from_sha: &str,
        cancel: &CancellationToken,
    ) -> Result<GitRef, GatewayError> {
        let url = self.repo_url(repo, &["git", "refs"]);
        let name = format!("refs/heads/{}", branch);
        let body = CreateRefBody {
            name: &name,
            sha: from_sha,
        };

        let created: GitHubRef = self.client.post_json(url.as_str(), &body, cancel).await?;

        Ok(GitRef {
            name: created.name,
            sha: created.object.sha,
        })
    }

    async fn create_pull_request(
        &self,
        repo: &RepoId,
        request: &CreatePullRequest,
        cancel: &CancellationToken,
    ) -> Result<PullRequest, GatewayError> {
        let url = self.repo_url(repo, &["pulls"]);
        let body = CreatePullBody {
            title: &request.title,
            head: &request.head,
            base: &request.base,
        };

        let pr: GitHubPullRequest = self.client.post_json(url.as_str(), &body, cancel).await?;
        Ok(pr.into())
    }
}
