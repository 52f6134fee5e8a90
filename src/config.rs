//! Release configuration loaded from the environment
//!
//! Variables:
//! - `GITHUB_TOKEN` (required)
//! - `ORGANIZATION_NAME` (default `cliqueinc`)
//! - `BRANCH_RELEASE_FROM` (default `develop`)
//! - `BRANCH_RELEASE_TO` (default `master`)
//! - `TIMEOUT_SECONDS` (default 60)
//! - `GITHUB_API_URL` (default `https://api.github.com`)
//!
//! Empty values are treated as unset.

use std::fmt;
use std::time::Duration;

use crate::domain::RepoId;
use crate::error::ConfigError;
use crate::gateway::DEFAULT_API_BASE;

pub const TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const ORGANIZATION_VAR: &str = "ORGANIZATION_NAME";
pub const SOURCE_BRANCH_VAR: &str = "BRANCH_RELEASE_FROM";
pub const TARGET_BRANCH_VAR: &str = "BRANCH_RELEASE_TO";
pub const TIMEOUT_VAR: &str = "TIMEOUT_SECONDS";
pub const API_URL_VAR: &str = "GITHUB_API_URL";

pub const DEFAULT_ORGANIZATION: &str = "cliqueinc";
pub const DEFAULT_SOURCE_BRANCH: &str = "develop";
pub const DEFAULT_TARGET_BRANCH: &str = "master";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for one release run
#[derive(Clone, PartialEq, Eq)]
pub struct ReleaseConfig {
    /// Access token for the repository host
    pub token: String,
    /// Organization owning the repositories
    pub organization: String,
    /// Branch the release is cut from
    pub source_branch: String,
    /// Branch the release pull request targets
    pub target_branch: String,
    /// Deadline for the whole workflow
    pub timeout: Duration,
    /// REST API base URL
    pub api_base: String,
}

impl fmt::Debug for ReleaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseConfig")
            .field("token", &"<redacted>")
            .field("organization", &self.organization)
            .field("source_branch", &self.source_branch)
            .field("target_branch", &self.target_branch)
            .field("timeout", &self.timeout)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl ReleaseConfig {
    /// Create a configuration with defaults for everything but the token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            organization: DEFAULT_ORGANIZATION.to_string(),
            source_branch: DEFAULT_SOURCE_BRANCH.to_string(),
            target_branch: DEFAULT_TARGET_BRANCH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get(TOKEN_VAR).ok_or_else(|| ConfigError::MissingToken {
            var: TOKEN_VAR.to_string(),
        })?;

        let mut config = Self::new(token);
        if let Some(org) = get(ORGANIZATION_VAR) {
            config.organization = org;
        }
        if let Some(branch) = get(SOURCE_BRANCH_VAR) {
            config.source_branch = branch;
        }
        if let Some(branch) = get(TARGET_BRANCH_VAR) {
            config.target_branch = branch;
        }
        if let Some(base) = get(API_URL_VAR) {
            config.api_base = base;
        }
        config.timeout = parse_timeout(get(TIMEOUT_VAR).as_deref());

        Ok(config)
    }

    /// Repository identifier within the configured organization
    pub fn repo_id(&self, name: &str) -> RepoId {
        RepoId::new(self.organization.clone(), name)
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn with_branches(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_branch = source.into();
        self.target_branch = target.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parse a whole-seconds timeout; non-positive or malformed values use the default
fn parse_timeout(value: Option<&str>) -> Duration {
    let secs = value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|secs| *secs > 0)
        .map(|secs| secs as u64)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
