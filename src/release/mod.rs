//! Release version logic
//!
//! This module provides:
//! - Latest release tag discovery through the repository gateway
//! - Pure version resolution from a directive and the previous release

mod discovery;
mod resolver;

pub use discovery::{discover_latest_tag, select_latest_tag};
pub use resolver::{bump, resolve};
