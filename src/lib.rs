//! git-release - release automation library
//!
//! This library provides the core functionality for cutting a release on a
//! hosted git repository:
//! - Parse the requested version change (patch, minor, major, or explicit)
//! - Discover the latest `v<semver>` release tag
//! - Resolve the next version
//! - Create the `release-v<version>` branch and open its pull request

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod release;
