//! Tag references discovered on the repository host

use serde::Serialize;

use crate::domain::SemanticVersion;

/// Prefix release tags carry in front of the version
pub const TAG_PREFIX: &str = "v";

/// A tag reference as listed by the host (e.g. `refs/tags/v1.2.3`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRef {
    /// Full reference name
    pub name: String,
    /// Commit the tag points at
    pub sha: String,
}

impl TagRef {
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sha: sha.into(),
        }
    }

    /// Short tag name: the last `/`-separated component of the ref
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Text after the `v` prefix, if the tag follows the release convention
    pub fn version_suffix(&self) -> Option<&str> {
        self.short_name()
            .strip_prefix(TAG_PREFIX)
            .filter(|rest| !rest.is_empty())
    }
}

/// The release tag selected as the latest one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestTag {
    /// The underlying reference
    pub tag: TagRef,
    /// Version embedded in the tag name
    pub version: SemanticVersion,
}
