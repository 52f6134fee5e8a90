//! Version resolution
//!
//! Computes the version to release from a directive and the latest released
//! version. Pure: no I/O, no clock, no randomness.

use crate::domain::{BumpKind, SemanticVersion, VersionDirective};
use crate::error::VersionError;

/// Resolve the new release version
///
/// A missing `previous` means the repository has no release yet; bumps then
/// start from `0.0.0` and explicit versions are accepted unconditionally.
pub fn resolve(
    directive: &VersionDirective,
    previous: Option<&SemanticVersion>,
) -> Result<SemanticVersion, VersionError> {
    match directive {
        VersionDirective::Bump(kind) => {
            let base = previous.cloned().unwrap_or_else(SemanticVersion::zero);
            bump(&base, *kind)
        }
        VersionDirective::Explicit(version) => match previous {
            Some(previous) if version <= previous => Err(VersionError::NotGreater {
                new: version.clone(),
                previous: previous.clone(),
            }),
            _ => Ok(version.clone()),
        },
        VersionDirective::Unspecified => Err(VersionError::Unspecified),
    }
}

/// Increment one component and reset the lower-order ones
///
/// Metadata on `base` is always dropped.
pub fn bump(base: &SemanticVersion, kind: BumpKind) -> Result<SemanticVersion, VersionError> {
    let overflow = |component| VersionError::Overflow {
        component,
        version: base.clone(),
    };

    let (major, minor, patch) = base.triple();
    let next = match kind {
        BumpKind::Patch => (
            major,
            minor,
            patch.checked_add(1).ok_or_else(|| overflow("patch"))?,
        ),
        BumpKind::Minor => (
            major,
            minor.checked_add(1).ok_or_else(|| overflow("minor"))?,
            0,
        ),
        BumpKind::Major => (major.checked_add(1).ok_or_else(|| overflow("major"))?, 0, 0),
    };

    Ok(SemanticVersion::new(next.0, next.1, next.2))
}
