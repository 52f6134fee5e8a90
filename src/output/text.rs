//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Release and dry-run result display with colors
//! - Failure lines naming the failed step
//! - A manual follow-up hint for partial success

use crate::domain::{ReleaseOutcome, ReleasePlan};
use crate::error::AppError;
use crate::gateway::PullRequest;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Width of the label column
const LABEL_WIDTH: usize = 18;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn short_sha(sha: &str) -> &str {
        sha.get(..7).unwrap_or(sha)
    }

    fn write_field(&self, label: &str, value: &str, writer: &mut dyn Write) -> std::io::Result<()> {
        let label = format!("{:width$}", format!("{}:", label), width = LABEL_WIDTH);
        if self.color {
            writeln!(writer, "  {}{}", label.dimmed(), value)
        } else {
            writeln!(writer, "  {}{}", label, value)
        }
    }

    fn write_plan(&self, plan: &ReleasePlan, writer: &mut dyn Write) -> std::io::Result<()> {
        let previous = plan
            .previous
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string());
        self.write_field("previous version", &previous, writer)?;

        let version = plan.version.to_string();
        if self.color {
            self.write_field(
                "new version",
                &version.bright_white().bold().to_string(),
                writer,
            )?;
        } else {
            self.write_field("new version", &version, writer)?;
        }

        let branch = if self.verbosity == Verbosity::Verbose {
            format!(
                "{} (from {} @ {})",
                plan.release_branch,
                plan.source.name,
                Self::short_sha(&plan.source.sha)
            )
        } else {
            format!("{} (from {})", plan.release_branch, plan.source.name)
        };
        self.write_field("release branch", &branch, writer)
    }

    fn write_pull_request(&self, pr: &PullRequest, writer: &mut dyn Write) -> std::io::Result<()> {
        let state = if self.color {
            pr.state.to_string().green().to_string()
        } else {
            pr.state.to_string()
        };
        self.write_field(
            "pull request",
            &format!("#{} {} -> {} [{}]", pr.number, pr.head, pr.base, state),
            writer,
        )?;
        self.write_field("url", &pr.url, writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format_outcome(
        &self,
        outcome: &ReleaseOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if self.verbosity == Verbosity::Quiet {
            return writeln!(writer, "{}", outcome.version());
        }

        match outcome {
            ReleaseOutcome::DryRun { plan } => {
                if self.color {
                    writeln!(
                        writer,
                        "{} next release version: {}",
                        "(dry-run)".cyan(),
                        plan.version.to_string().bold()
                    )?;
                } else {
                    writeln!(writer, "(dry-run) next release version: {}", plan.version)?;
                }
                self.write_plan(plan, writer)?;
                self.write_field(
                    "pull request",
                    &format!(
                        "{} -> {} \"{}\" (not created)",
                        plan.release_branch, plan.target.name, plan.title
                    ),
                    writer,
                )
            }
            ReleaseOutcome::Released { plan, pull_request } => {
                if self.color {
                    writeln!(
                        writer,
                        "{} new release version: {}",
                        "✓".green(),
                        plan.version.to_string().bold()
                    )?;
                } else {
                    writeln!(writer, "new release version: {}", plan.version)?;
                }
                self.write_plan(plan, writer)?;
                self.write_pull_request(pull_request, writer)
            }
        }
    }

    fn format_error(&self, error: &AppError, writer: &mut dyn Write) -> std::io::Result<()> {
        let headline = if error.is_partial_success() {
            "release partially completed"
        } else {
            "release failed"
        };

        if self.color {
            let headline = if error.is_partial_success() {
                headline.yellow().bold()
            } else {
                headline.red().bold()
            };
            writeln!(
                writer,
                "{} {}: {}",
                headline,
                format!("[{}]", error.step()).dimmed(),
                error
            )
        } else {
            writeln!(writer, "{} [{}]: {}", headline, error.step(), error)
        }
    }
}
