//! JSON output formatter for machine processing
//!
//! Successful runs and failures are both written as a single JSON object on
//! stdout, distinguished by `status`.

use crate::domain::{ReleaseOutcome, SemanticVersion};
use crate::error::AppError;
use crate::gateway::PullRequest;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a finished run
#[derive(Serialize)]
struct JsonOutcome<'a> {
    /// `dry_run` or `released`
    status: &'static str,
    dry_run: bool,
    version: &'a SemanticVersion,
    previous_version: Option<&'a SemanticVersion>,
    release_branch: &'a str,
    source_branch: &'a str,
    target_branch: &'a str,
    title: &'a str,
    /// Source commit (verbose only)
    #[serde(skip_serializing_if = "Option::is_none")]
    source_sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pull_request: Option<&'a PullRequest>,
}

/// JSON representation of a failure
#[derive(Serialize)]
struct JsonError<'a> {
    /// `failed` or `partial`
    status: &'static str,
    step: &'static str,
    error: String,
    /// Branch that was created (partial only)
    #[serde(skip_serializing_if = "Option::is_none")]
    release_branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a SemanticVersion>,
}

fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writeln!(writer, "{}", json)
}

impl OutputFormatter for JsonFormatter {
    fn format_outcome(
        &self,
        outcome: &ReleaseOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let plan = outcome.plan();
        let output = JsonOutcome {
            status: if outcome.is_dry_run() {
                "dry_run"
            } else {
                "released"
            },
            dry_run: outcome.is_dry_run(),
            version: &plan.version,
            previous_version: plan.previous.as_ref(),
            release_branch: &plan.release_branch,
            source_branch: &plan.source.name,
            target_branch: &plan.target.name,
            title: &plan.title,
            source_sha: (self.verbosity == Verbosity::Verbose).then_some(plan.source.sha.as_str()),
            pull_request: outcome.pull_request(),
        };
        write_json(&output, writer)
    }

    fn format_error(&self, error: &AppError, writer: &mut dyn Write) -> std::io::Result<()> {
        let partial = error.partial_release();
        let output = JsonError {
            status: if partial.is_some() {
                "partial"
            } else {
                "failed"
            },
            step: error.step(),
            error: error.to_string(),
            release_branch: partial.map(|(branch, _)| branch),
            version: partial.map(|(_, version)| version),
        };
        write_json(&output, writer)
    }

    fn errors_to_stdout(&self) -> bool {
        true
    }
}
