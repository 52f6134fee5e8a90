//! Release request, plan and outcome types
//!
//! A `ReleasePlan` is built once the new version is resolved and is consumed
//! immediately to drive the mutating gateway calls. Nothing here is persisted.

use serde::Serialize;
use std::fmt;

use crate::domain::{SemanticVersion, VersionDirective};
use crate::gateway::PullRequest;

/// Prefix of every release branch name
pub const RELEASE_BRANCH_PREFIX: &str = "release-v";

/// Builds the release branch name for a version (`release-v<version>`)
pub fn release_branch_name(version: &SemanticVersion) -> String {
    format!("{}{}", RELEASE_BRANCH_PREFIX, version)
}

/// Builds the pull request title for a version (`Release v<version>`)
pub fn release_title(version: &SemanticVersion) -> String {
    format!("Release v{}", version)
}

/// What the caller asked for
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    /// Repository name within the configured organization
    pub repo: String,
    /// Requested version change
    pub directive: VersionDirective,
    /// Compute and report only, no mutating calls
    pub dry_run: bool,
}

impl ReleaseRequest {
    pub fn new(repo: impl Into<String>, directive: VersionDirective, dry_run: bool) -> Self {
        Self {
            repo: repo.into(),
            directive,
            dry_run,
        }
    }
}

/// A branch and the commit it currently points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchHead {
    pub name: String,
    pub sha: String,
}

/// Everything needed to cut the release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
    /// Version being released
    pub version: SemanticVersion,
    /// Latest released version, if any
    pub previous: Option<SemanticVersion>,
    /// Branch the release is cut from
    pub source: BranchHead,
    /// Branch the pull request targets
    pub target: BranchHead,
    /// Name of the release branch
    pub release_branch: String,
    /// Title of the release pull request
    pub title: String,
}

impl ReleasePlan {
    pub fn new(
        version: SemanticVersion,
        previous: Option<SemanticVersion>,
        source: BranchHead,
        target: BranchHead,
    ) -> Self {
        Self {
            release_branch: release_branch_name(&version),
            title: release_title(&version),
            version,
            previous,
            source,
            target,
        }
    }
}

/// Successful end of a release run
#[derive(Debug, Clone)]
pub enum ReleaseOutcome {
    /// Dry run: the plan was computed, nothing was created
    DryRun { plan: ReleasePlan },
    /// Branch and pull request were created
    Released {
        plan: ReleasePlan,
        pull_request: PullRequest,
    },
}

impl ReleaseOutcome {
    pub fn plan(&self) -> &ReleasePlan {
        match self {
            ReleaseOutcome::DryRun { plan } | ReleaseOutcome::Released { plan, .. } => plan,
        }
    }

    pub fn version(&self) -> &SemanticVersion {
        &self.plan().version
    }

    pub fn release_branch(&self) -> &str {
        &self.plan().release_branch
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, ReleaseOutcome::DryRun { .. })
    }

    pub fn pull_request(&self) -> Option<&PullRequest> {
        match self {
            ReleaseOutcome::DryRun { .. } => None,
            ReleaseOutcome::Released { pull_request, .. } => Some(pull_request),
        }
    }
}

/// Workflow state, advanced strictly in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStage {
    Start,
    RepoVerified,
    BranchesVerified,
    VersionResolved,
    DryRunReported,
    BranchCreated,
    PrCreated,
    Done,
}

impl ReleaseStage {
    /// Terminal success states
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReleaseStage::DryRunReported | ReleaseStage::Done)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReleaseStage::Start => "start",
            ReleaseStage::RepoVerified => "repo verified",
            ReleaseStage::BranchesVerified => "branches verified",
            ReleaseStage::VersionResolved => "version resolved",
            ReleaseStage::DryRunReported => "dry run reported",
            ReleaseStage::BranchCreated => "branch created",
            ReleaseStage::PrCreated => "pull request created",
            ReleaseStage::Done => "done",
        }
    }
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
