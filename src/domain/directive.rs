//! Requested version change for a release
//!
//! A directive is either a bump keyword (`patch`, `minor`, `major`) or an
//! explicit semantic version. Empty input is classified as `Unspecified`
//! and rejected by the caller before any network call.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::SemanticVersion;
use crate::error::InputError;

/// Which component a bump increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BumpKind {
    /// Increment patch
    Patch,
    /// Increment minor, reset patch
    Minor,
    /// Increment major, reset minor and patch
    Major,
}

impl BumpKind {
    /// Get the keyword accepted on the command line
    pub fn keyword(&self) -> &'static str {
        match self {
            BumpKind::Patch => "patch",
            BumpKind::Minor => "minor",
            BumpKind::Major => "major",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "patch" => Some(BumpKind::Patch),
            "minor" => Some(BumpKind::Minor),
            "major" => Some(BumpKind::Major),
            _ => None,
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The user's requested version change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionDirective {
    /// Bump the latest release
    Bump(BumpKind),
    /// Release exactly this version
    Explicit(SemanticVersion),
    /// Nothing was requested
    Unspecified,
}

impl VersionDirective {
    /// Classifies raw CLI input
    ///
    /// Empty input yields `Unspecified`; anything that is neither a bump
    /// keyword nor a valid semantic version is an `InputError`.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        if raw.is_empty() {
            return Ok(VersionDirective::Unspecified);
        }

        if let Some(kind) = BumpKind::from_keyword(raw) {
            return Ok(VersionDirective::Bump(kind));
        }

        SemanticVersion::parse(raw)
            .map(VersionDirective::Explicit)
            .map_err(|source| InputError::InvalidVersion {
                value: raw.to_string(),
                source,
            })
    }

    /// Rejects `Unspecified`, passing any other directive through
    pub fn require(self) -> Result<Self, InputError> {
        match self {
            VersionDirective::Unspecified => Err(InputError::EmptyVersion),
            other => Ok(other),
        }
    }

    pub fn is_unspecified(&self) -> bool {
        matches!(self, VersionDirective::Unspecified)
    }
}

impl FromStr for VersionDirective {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionDirective::Bump(kind) => write!(f, "{}", kind),
            VersionDirective::Explicit(version) => write!(f, "{}", version),
            VersionDirective::Unspecified => f.write_str(""),
        }
    }
}
