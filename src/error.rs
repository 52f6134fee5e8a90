//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: Missing or unusable environment configuration
//! - InputError: Invalid CLI input, detected before any network call
//! - GatewayError: Failures talking to the repository host
//! - VersionError: Version resolution failures
//! - ReleaseError: Workflow failures with the step they occurred at

use std::time::Duration;
use thiserror::Error;

use crate::domain::SemanticVersion;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// CLI input related errors
    #[error(transparent)]
    Input(#[from] InputError),

    /// Repository host related errors
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Release workflow errors
    #[error(transparent)]
    Release(#[from] ReleaseError),
}

impl AppError {
    /// Returns true when durable remote state was created before the failure
    pub fn is_partial_success(&self) -> bool {
        matches!(self, AppError::Release(e) if e.is_partial_success())
    }

    /// Branch and version left behind by a partial success
    pub fn partial_release(&self) -> Option<(&str, &SemanticVersion)> {
        match self {
            AppError::Release(e) => e.partial_release(),
            _ => None,
        }
    }

    /// Name of the step the failure happened at
    pub fn step(&self) -> &'static str {
        match self {
            AppError::Config(_) => "load configuration",
            AppError::Input(_) => "validate input",
            AppError::Gateway(_) => "connect",
            AppError::Release(e) => e.step(),
        }
    }
}

/// Errors related to configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Access token environment variable is absent or empty
    #[error("{var} is required")]
    MissingToken { var: String },
}

/// Errors related to CLI input
#[derive(Error, Debug)]
pub enum InputError {
    /// No version directive was given
    #[error(
        "version cannot be empty. Should be one of patch,minor,major, or specific version e.g. 1.3.5"
    )]
    EmptyVersion,

    /// Version directive is neither a bump keyword nor a semantic version
    #[error("cannot parse version param ({value}): {source}. Should be one of patch,minor,major, or specific version e.g. 1.3.5")]
    InvalidVersion {
        value: String,
        #[source]
        source: semver::Error,
    },

    /// Repository name is empty
    #[error("repository name cannot be empty")]
    EmptyRepo,
}

/// Errors from repository host operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The requested resource was not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Token missing, invalid, expired or lacking permissions
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Rate limit exceeded
    #[error("rate limited")]
    RateLimited,

    /// API returned an error status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network or connection error
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A listing did not end within the page limit
    #[error("listing truncated after {pages} pages")]
    Truncated { pages: usize },

    /// The API base is not a usable URL
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    /// The call was abandoned because the workflow was cancelled
    #[error("request cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Returns true for the not-found classification
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }
}

/// Errors related to version resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Explicit version does not exceed the previous release
    #[error("new version ({new}) should be greater than previous one ({previous})")]
    NotGreater {
        new: SemanticVersion,
        previous: SemanticVersion,
    },

    /// No directive was supplied
    #[error("no version directive specified")]
    Unspecified,

    /// A version component cannot be incremented any further
    #[error("cannot bump {component} of {version}: component overflow")]
    Overflow {
        component: &'static str,
        version: SemanticVersion,
    },
}

/// Errors raised by the release workflow, tagged with the failing step
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Repository does not exist (or is not visible to the token)
    #[error("fail get repo ({repo}): {source}")]
    RepoNotFound {
        repo: String,
        #[source]
        source: GatewayError,
    },

    /// Repository lookup failed for another reason
    #[error("fail get repo ({repo}): {source}")]
    Repository {
        repo: String,
        #[source]
        source: GatewayError,
    },

    /// Source or target branch does not exist
    #[error("fail get branch ({branch}): {source}")]
    BranchNotFound {
        branch: String,
        #[source]
        source: GatewayError,
    },

    /// Branch lookup failed for another reason
    #[error("fail get branch ({branch}): {source}")]
    Branch {
        branch: String,
        #[source]
        source: GatewayError,
    },

    /// Listing tags failed
    #[error("fail get latest version: {0}")]
    LatestVersion(#[source] GatewayError),

    /// The new version could not be computed
    #[error("fail create new version: {0}")]
    NewVersion(#[source] VersionError),

    /// The release branch could not be created
    #[error("fail create branch ({branch}): {source}")]
    CreateBranch {
        branch: String,
        #[source]
        source: GatewayError,
    },

    /// The release branch exists but the pull request could not be opened
    #[error("branch ({branch}) for version {version} has been created, but fail create pull request: ({source}), please create it manually")]
    PartialSuccess {
        branch: String,
        version: SemanticVersion,
        #[source]
        source: GatewayError,
    },

    /// The workflow did not finish before the deadline
    #[error("release timed out after {0:?}")]
    Timeout(Duration),

    /// The workflow task ended without reporting a result
    #[error("release worker stopped unexpectedly: {0}")]
    Worker(String),
}

impl ReleaseError {
    /// Returns true when durable remote state was created before the failure
    pub fn is_partial_success(&self) -> bool {
        matches!(self, ReleaseError::PartialSuccess { .. })
    }

    /// Branch and version left behind by a partial success
    pub fn partial_release(&self) -> Option<(&str, &SemanticVersion)> {
        match self {
            ReleaseError::PartialSuccess {
                branch, version, ..
            } => Some((branch.as_str(), version)),
            _ => None,
        }
    }

    /// Name of the workflow step this error belongs to
    pub fn step(&self) -> &'static str {
        match self {
            ReleaseError::RepoNotFound { .. } | ReleaseError::Repository { .. } => {
                "verify repository"
            }
            ReleaseError::BranchNotFound { .. } | ReleaseError::Branch { .. } => "verify branches",
            ReleaseError::LatestVersion(_) => "discover latest tag",
            ReleaseError::NewVersion(_) => "resolve version",
            ReleaseError::CreateBranch { .. } => "create branch",
            ReleaseError::PartialSuccess { .. } => "create pull request",
            ReleaseError::Timeout(_) | ReleaseError::Worker(_) => "run",
        }
    }
}
