//! git-release - release automation CLI tool
//!
//! Cuts a release branch from the source branch and opens a pull request
//! into the target branch, naming both after the next semantic version.

use clap::Parser;
use git_release::cli::CliArgs;
use git_release::config::ReleaseConfig;
use git_release::domain::ReleaseOutcome;
use git_release::error::AppError;
use git_release::gateway::{GitHubGateway, HttpClient};
use git_release::orchestrator::Orchestrator;
use git_release::output::{create_formatter, OutputConfig, OutputFormatter};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Exit code when the release branch exists but the pull request does not
const EXIT_PARTIAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Handle version flag
    if args.print_version {
        println!("git-release {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    init_tracing(args.log_level());

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet)
        .with_color(io::stdout().is_terminal());
    let formatter = create_formatter(output_config);

    match run(&args).await {
        Ok(outcome) => match write_outcome(formatter.as_ref(), &outcome) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
        Err(error) => {
            if let Err(e) = write_error(formatter.as_ref(), &error) {
                eprintln!("Error: {:#}", e);
            }
            if error.is_partial_success() {
                ExitCode::from(EXIT_PARTIAL)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Main application logic
async fn run(args: &CliArgs) -> Result<ReleaseOutcome, AppError> {
    // Input is checked before configuration and before any network call
    let request = args.validate()?.into_request();
    let config = ReleaseConfig::from_env()?;

    tracing::debug!(config = ?config, "loaded configuration");

    let client = HttpClient::new(&config.token)?;
    let gateway = GitHubGateway::with_api_base(client, &config.api_base)?;

    let orchestrator =
        Orchestrator::new(config, Arc::new(gateway)).with_progress(args.show_progress());
    let outcome = orchestrator.run_with_timeout(request, None).await?;
    Ok(outcome)
}

fn write_outcome(formatter: &dyn OutputFormatter, outcome: &ReleaseOutcome) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    formatter.format_outcome(outcome, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn write_error(formatter: &dyn OutputFormatter, error: &AppError) -> anyhow::Result<()> {
    if formatter.errors_to_stdout() {
        let mut stdout = io::stdout().lock();
        formatter.format_error(error, &mut stdout)?;
        stdout.flush()?;
    } else {
        let mut stderr = io::stderr().lock();
        formatter.format_error(error, &mut stderr)?;
        stderr.flush()?;
    }
    Ok(())
}
