//! Core domain models for git-release
//!
//! This module contains the fundamental types used throughout the application:
//! - Semantic version value and its ordering
//! - Version directive requested on the command line
//! - Tag references discovered on the host
//! - Release request, plan, outcome and workflow stage

mod directive;
mod plan;
mod repo;
mod tag;
mod version;

pub use directive::{BumpKind, VersionDirective};
pub use plan::{
    release_branch_name, release_title, BranchHead, ReleaseOutcome, ReleasePlan, ReleaseRequest,
    ReleaseStage, RELEASE_BRANCH_PREFIX,
};
pub use repo::RepoId;
pub use tag::{LatestTag, TagRef, TAG_PREFIX};
pub use version::SemanticVersion;
