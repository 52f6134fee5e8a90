//! Latest release tag discovery
//!
//! Release tags follow the `v<semver>` convention. The latest release is the
//! tag carrying the highest version, independent of the order the host lists
//! references in.

use std::cmp::Ordering;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{LatestTag, RepoId, SemanticVersion, TagRef};
use crate::error::GatewayError;
use crate::gateway::RepositoryGateway;

/// Fetch all tag refs and select the latest release tag
///
/// A repository without tags, or whose tags endpoint answers not-found, has
/// no previous release and yields `Ok(None)`.
pub async fn discover_latest_tag(
    gateway: &dyn RepositoryGateway,
    repo: &RepoId,
    cancel: &CancellationToken,
) -> Result<Option<LatestTag>, GatewayError> {
    let refs = match gateway.list_tag_refs(repo, cancel).await {
        Ok(refs) => refs,
        Err(e) if e.is_not_found() => {
            debug!(repo = %repo, "no tag refs found");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    debug!(repo = %repo, count = refs.len(), "listed tag refs");
    Ok(select_latest_tag(&refs))
}

/// Select the `v<semver>` tag with the highest version
///
/// Refs without the `v` prefix, with nothing after it, or whose suffix is not
/// a semantic version are ignored.
pub fn select_latest_tag(refs: &[TagRef]) -> Option<LatestTag> {
    refs.iter()
        .filter_map(release_version)
        .max_by(|(a_tag, a), (b_tag, b)| compare_candidates(a_tag, a, b_tag, b))
        .map(|(tag, version)| LatestTag {
            tag: tag.clone(),
            version,
        })
}

fn release_version(tag: &TagRef) -> Option<(&TagRef, SemanticVersion)> {
    let suffix = tag.version_suffix()?;
    match SemanticVersion::parse(suffix) {
        Ok(version) => Some((tag, version)),
        Err(e) => {
            warn!(tag = %tag.name, error = %e, "skipping tag that is not a semantic version");
            None
        }
    }
}

// Equal triples only differ in metadata; fall back to full semver precedence
// and then the tag name so the choice never depends on listing order.
fn compare_candidates(
    a_tag: &TagRef,
    a: &SemanticVersion,
    b_tag: &TagRef,
    b: &SemanticVersion,
) -> Ordering {
    a.cmp(b)
        .then_with(|| a.as_semver().cmp(b.as_semver()))
        .then_with(|| a_tag.name.cmp(&b_tag.name))
}
