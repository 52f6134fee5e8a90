//! CLI argument parsing module for git-release

use clap::{ArgAction, Parser};

use crate::domain::{ReleaseRequest, VersionDirective};
use crate::error::InputError;

/// Cut a release branch and open its pull request
#[derive(Parser, Debug, Clone)]
#[command(
    name = "git-release",
    about = "Cut a release branch and open its pull request",
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Semantic version of the new release. One of patch, minor, major, or a specific version e.g. 1.3.5
    #[arg(long, default_value = "")]
    pub version: String,

    /// Repository name to build the new release for
    #[arg(long, default_value = "")]
    pub repo: String,

    /// Show the version that would be released without creating anything (--dry or --dry=true)
    #[arg(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub dry: bool,

    // Output options
    /// Output the result in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the tool version and exit
    #[arg(long)]
    pub print_version: bool,
}

/// Arguments that passed input validation
#[derive(Debug, Clone)]
pub struct ValidatedArgs {
    pub repo: String,
    pub directive: VersionDirective,
    pub dry_run: bool,
}

impl ValidatedArgs {
    pub fn into_request(self) -> ReleaseRequest {
        ReleaseRequest::new(self.repo, self.directive, self.dry_run)
    }
}

impl CliArgs {
    /// Check the version directive, then the repository name
    pub fn validate(&self) -> Result<ValidatedArgs, InputError> {
        let directive = VersionDirective::parse(&self.version)?.require()?;

        let repo = self.repo.trim();
        if repo.is_empty() {
            return Err(InputError::EmptyRepo);
        }

        Ok(ValidatedArgs {
            repo: repo.to_string(),
            directive,
            dry_run: self.dry,
        })
    }

    /// Spinner is only shown for interactive text output
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BumpKind, SemanticVersion};

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["git-release"]);
        assert_eq!(args.version, "");
        assert_eq!(args.repo, "");
        assert!(!args.dry);
        assert!(!args.json);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(!args.print_version);
    }

    #[test]
    fn test_version_is_a_value_flag() {
        let args = CliArgs::parse_from(["git-release", "--version", "minor"]);
        assert_eq!(args.version, "minor");

        let args = CliArgs::parse_from(["git-release", "--version=1.3.5"]);
        assert_eq!(args.version, "1.3.5");
    }

    #[test]
    fn test_dry_bare_flag() {
        let args = CliArgs::parse_from(["git-release", "--dry"]);
        assert!(args.dry);
    }

    #[test]
    fn test_dry_with_value() {
        let args = CliArgs::parse_from(["git-release", "--dry=true"]);
        assert!(args.dry);

        let args = CliArgs::parse_from(["git-release", "--dry=false"]);
        assert!(!args.dry);
    }

    #[test]
    fn test_dry_rejects_non_bool() {
        assert!(CliArgs::try_parse_from(["git-release", "--dry=maybe"]).is_err());
    }

    #[test]
    fn test_quiet_flags() {
        let args = CliArgs::parse_from(["git-release", "-q"]);
        assert!(args.quiet);

        let args = CliArgs::parse_from(["git-release", "--quiet"]);
        assert!(args.quiet);
    }

    #[test]
    fn test_print_version_flag() {
        let args = CliArgs::parse_from(["git-release", "--print-version"]);
        assert!(args.print_version);
    }

    #[test]
    fn test_validate_bump() {
        let args = CliArgs::parse_from(["git-release", "--version", "patch", "--repo", "api"]);
        let valid = args.validate().unwrap();
        assert_eq!(valid.repo, "api");
        assert_eq!(valid.directive, VersionDirective::Bump(BumpKind::Patch));
        assert!(!valid.dry_run);
    }

    #[test]
    fn test_validate_explicit_dry() {
        let args = CliArgs::parse_from([
            "git-release",
            "--version",
            "2.0.0",
            "--repo",
            "api",
            "--dry",
        ]);
        let request = args.validate().unwrap().into_request();
        assert_eq!(
            request.directive,
            VersionDirective::Explicit(SemanticVersion::new(2, 0, 0))
        );
        assert!(request.dry_run);
        assert_eq!(request.repo, "api");
    }

    #[test]
    fn test_validate_empty_version() {
        let args = CliArgs::parse_from(["git-release", "--repo", "api"]);
        assert!(matches!(args.validate(), Err(InputError::EmptyVersion)));
    }

    #[test]
    fn test_validate_invalid_version() {
        let args = CliArgs::parse_from(["git-release", "--version", "1.x", "--repo", "api"]);
        assert!(matches!(
            args.validate(),
            Err(InputError::InvalidVersion { ref value, .. }) if value == "1.x"
        ));
    }

    #[test]
    fn test_validate_version_checked_before_repo() {
        let args = CliArgs::parse_from(["git-release"]);
        assert!(matches!(args.validate(), Err(InputError::EmptyVersion)));
    }

    #[test]
    fn test_validate_empty_repo() {
        let args = CliArgs::parse_from(["git-release", "--version", "major"]);
        assert!(matches!(args.validate(), Err(InputError::EmptyRepo)));

        let args = CliArgs::parse_from(["git-release", "--version", "major", "--repo", "  "]);
        assert!(matches!(args.validate(), Err(InputError::EmptyRepo)));
    }

    #[test]
    fn test_show_progress() {
        assert!(CliArgs::parse_from(["git-release"]).show_progress());
        assert!(!CliArgs::parse_from(["git-release", "-q"]).show_progress());
        assert!(!CliArgs::parse_from(["git-release", "--json"]).show_progress());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(CliArgs::parse_from(["git-release"]).log_level(), "info");
        assert_eq!(
            CliArgs::parse_from(["git-release", "--verbose"]).log_level(),
            "debug"
        );
        assert_eq!(
            CliArgs::parse_from(["git-release", "--quiet", "--verbose"]).log_level(),
            "warn"
        );
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "git-release",
            "--version",
            "minor",
            "--repo",
            "billing",
            "--dry=true",
            "--json",
            "--verbose",
        ]);
        assert_eq!(args.version, "minor");
        assert_eq!(args.repo, "billing");
        assert!(args.dry);
        assert!(args.json);
        assert!(args.verbose);
    }
}
