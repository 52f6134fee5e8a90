//! Release orchestrator for coordinating the release workflow
//!
//! This module provides:
//! - Workflow coordination: verify repo → verify branches → resolve version →
//!   create branch → open pull request
//! - Dry-run mode that stops before any mutating call
//! - A deadline on the whole workflow, enforced through a spawned task and a
//!   shared cancellation token
//! - Step-contextualised errors, with partial success kept distinct

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ReleaseConfig;
use crate::domain::{BranchHead, ReleaseOutcome, ReleasePlan, ReleaseRequest, ReleaseStage, RepoId};
use crate::error::ReleaseError;
use crate::gateway::{CreatePullRequest, RepositoryGateway};
use crate::progress::Progress;
use crate::release::{discover_latest_tag, resolve};

/// Orchestrator for one release
#[derive(Clone)]
pub struct Orchestrator {
    /// Organization, branches and deadline
    config: ReleaseConfig,
    /// Repository host
    gateway: Arc<dyn RepositoryGateway>,
    /// Whether to show a spinner
    show_progress: bool,
}

impl Orchestrator {
    /// Create a new orchestrator with progress display off
    pub fn new(config: ReleaseConfig, gateway: Arc<dyn RepositoryGateway>) -> Self {
        Self {
            config,
            gateway,
            show_progress: false,
        }
    }

    /// Enable or disable the spinner
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Run the workflow on a spawned task, bounded by a deadline
    ///
    /// `timeout` overrides the configured deadline. When the deadline passes
    /// the shared token is cancelled and the run fails with `Timeout`, even if
    /// the release branch was already created.
    pub async fn run_with_timeout(
        &self,
        request: ReleaseRequest,
        timeout: Option<Duration>,
    ) -> Result<ReleaseOutcome, ReleaseError> {
        let deadline = timeout.unwrap_or(self.config.timeout);
        let cancel = CancellationToken::new();

        let worker = self.clone();
        let token = cancel.clone();
        let mut handle = tokio::spawn(async move { worker.run(&request, &token).await });

        match tokio::time::timeout(deadline, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(ReleaseError::Worker(join_err.to_string())),
            Err(_) => {
                warn!(timeout = ?deadline, "release deadline passed, cancelling");
                cancel.cancel();
                Err(ReleaseError::Timeout(deadline))
            }
        }
    }

    /// Run the workflow in the current task
    pub async fn run(
        &self,
        request: &ReleaseRequest,
        cancel: &CancellationToken,
    ) -> Result<ReleaseOutcome, ReleaseError> {
        let mut progress = Progress::new(self.show_progress);
        let result = self.execute(request, cancel, &mut progress).await;
        progress.finish_and_clear();
        result
    }

    async fn execute(
        &self,
        request: &ReleaseRequest,
        cancel: &CancellationToken,
        progress: &mut Progress,
    ) -> Result<ReleaseOutcome, ReleaseError> {
        let gateway = self.gateway.as_ref();
        let repo = self.config.repo_id(&request.repo);
        let mut stage = ReleaseStage::Start;

        info!(
            repo = %repo,
            gateway = gateway.name(),
            directive = %request.directive,
            dry_run = request.dry_run,
            "specified version"
        );

        // Step 1: repository
        progress.spinner(&format!("Checking repository {}...", repo));
        gateway
            .get_repository(&repo, cancel)
            .await
            .map_err(|source| {
                if source.is_not_found() {
                    ReleaseError::RepoNotFound {
                        repo: repo.to_string(),
                        source,
                    }
                } else {
                    ReleaseError::Repository {
                        repo: repo.to_string(),
                        source,
                    }
                }
            })?;
        advance(&mut stage, ReleaseStage::RepoVerified);

        // Step 2: source then target branch
        progress.set_message("Checking branches...");
        let source = self
            .verify_branch(&repo, &self.config.source_branch, cancel)
            .await?;
        let target = self
            .verify_branch(&repo, &self.config.target_branch, cancel)
            .await?;
        advance(&mut stage, ReleaseStage::BranchesVerified);

        // Step 3: previous release and new version
        progress.set_message("Resolving version...");
        let latest = discover_latest_tag(gateway, &repo, cancel)
            .await
            .map_err(ReleaseError::LatestVersion)?;
        match &latest {
            Some(latest) => info!(tag = %latest.tag.name, version = %latest.version, "latest tag"),
            None => info!("no previous release tag"),
        }

        let previous = latest.map(|l| l.version);
        let version =
            resolve(&request.directive, previous.as_ref()).map_err(ReleaseError::NewVersion)?;
        info!(version = %version, "new version");

        let plan = ReleasePlan::new(version, previous, source, target);
        advance(&mut stage, ReleaseStage::VersionResolved);

        if request.dry_run {
            info!(branch = %plan.release_branch, "dry run, branch and pull request not created");
            advance(&mut stage, ReleaseStage::DryRunReported);
            return Ok(ReleaseOutcome::DryRun { plan });
        }

        // Step 4: release branch
        progress.set_message(&format!("Creating branch {}...", plan.release_branch));
        let created = gateway
            .create_branch_ref(&repo, &plan.release_branch, &plan.source.sha, cancel)
            .await
            .map_err(|source| ReleaseError::CreateBranch {
                branch: plan.release_branch.clone(),
                source,
            })?;
        info!(branch = %plan.release_branch, from = %plan.source.name, sha = %created.sha, "branch created");
        advance(&mut stage, ReleaseStage::BranchCreated);

        // Step 5: pull request; the branch stays if this fails
        progress.set_message("Opening pull request...");
        let pr_request = CreatePullRequest {
            head: plan.release_branch.clone(),
            base: plan.target.name.clone(),
            title: plan.title.clone(),
        };
        let pull_request = match gateway
            .create_pull_request(&repo, &pr_request, cancel)
            .await
        {
            Ok(pr) => pr,
            Err(source) => {
                warn!(branch = %plan.release_branch, error = %source, "pull request not created");
                return Err(ReleaseError::PartialSuccess {
                    branch: plan.release_branch.clone(),
                    version: plan.version.clone(),
                    source,
                });
            }
        };
        info!(
            number = pull_request.number,
            state = %pull_request.state,
            url = %pull_request.url,
            "pull request created"
        );
        advance(&mut stage, ReleaseStage::PrCreated);
        advance(&mut stage, ReleaseStage::Done);

        Ok(ReleaseOutcome::Released { plan, pull_request })
    }

    async fn verify_branch(
        &self,
        repo: &RepoId,
        branch: &str,
        cancel: &CancellationToken,
    ) -> Result<BranchHead, ReleaseError> {
        let info = self
            .gateway
            .get_branch(repo, branch, cancel)
            .await
            .map_err(|source| {
                if source.is_not_found() {
                    ReleaseError::BranchNotFound {
                        branch: branch.to_string(),
                        source,
                    }
                } else {
                    ReleaseError::Branch {
                        branch: branch.to_string(),
                        source,
                    }
                }
            })?;

        debug!(branch = %info.name, sha = %info.commit_sha, "branch verified");
        Ok(BranchHead {
            name: info.name,
            sha: info.commit_sha,
        })
    }
}

fn advance(stage: &mut ReleaseStage, next: ReleaseStage) {
    debug_assert!(
        next > *stage,
        "stage moved backwards: {} -> {}",
        stage,
        next
    );
    debug!(from = %stage, to = %next, "stage");
    *stage = next;
}
