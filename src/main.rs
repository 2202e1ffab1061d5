//! diffscribe - turns a git diff into a commit title and description.
//!
//! Sends a developer profile and a diff to the Anthropic messages API and
//! prints the reply split into a title line and a description body,
//! optionally saving it as Markdown.

mod buffer;
mod config;
mod error;
mod inputs;
mod output;
mod payload;
mod pipeline;
mod response;
mod transport;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use pipeline::Pipeline;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use transport::{HttpTransport, TransportConfig};

#[derive(Parser, Debug)]
#[command(name = "diffscribe")]
#[command(author, version, about = "Claude API client for git diff analysis")]
#[command(after_help = "Examples:\n  \
    diffscribe \"$(git diff)\"                        # Use defaults\n  \
    diffscribe -k custom_key.txt \"$(git diff)\"      # Custom API key\n  \
    diffscribe -p my_profile.txt \"$(git diff)\"      # Custom profile\n  \
    diffscribe -d changes.diff                      # Read diff from file\n  \
    diffscribe -o commit_message.md \"$(git diff)\"   # Save to file")]
struct Cli {
    /// The git diff to describe
    #[arg(value_name = "GIT_DIFF", conflicts_with = "diff_file", required_unless_present = "diff_file")]
    diff: Option<String>,

    /// Path to file containing the API key (default: ~/.config/claude/api_key.txt)
    #[arg(short = 'k', long, value_name = "FILE")]
    key_file: Option<PathBuf>,

    /// Path to profile file (default: ~/.config/claude/profile.txt)
    #[arg(short = 'p', long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Read the git diff from a file instead of the command line
    #[arg(short = 'd', long, value_name = "FILE")]
    diff_file: Option<PathBuf>,

    /// Save results to the specified file
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    run(cli, config).await
}

/// Initialize logging on stderr. `-v` turns on debug traces; RUST_LOG still applies.
///
/// Only this crate's own targets are raised: connection-level tracing in the
/// HTTP stack dumps raw request bytes, credentials included.
fn init_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

fn log_filter(verbose: bool) -> EnvFilter {
    let directive = if verbose {
        "diffscribe=debug"
    } else {
        "diffscribe=warn"
    };

    let filter = EnvFilter::from_default_env();
    match directive.parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Load inputs, call the API and deliver the result.
async fn run(cli: Cli, config: Config) -> Result<()> {
    tracing::debug!("Debug mode enabled");

    let default_key_path = config.api_key_path()?;
    let api_key = inputs::load_api_key(cli.key_file.as_deref(), &default_key_path)?;

    let profile_path = match cli.profile {
        Some(path) => path,
        None => config.profile_path()?,
    };
    tracing::debug!("Using profile from: {}", profile_path.display());
    let profile = inputs::load_profile(&profile_path)?;

    let diff = inputs::load_diff(cli.diff, cli.diff_file.as_deref())?;

    let transport = HttpTransport::new(TransportConfig::from_config(&config, cli.verbose))?;
    let pipeline = Pipeline::new(config.api, transport);

    eprintln!("Sending request to Anthropic API...");
    let message = pipeline
        .generate(&api_key, &profile, &diff)
        .await
        .context("Failed to get a commit message from the API")?;

    print!("{}", output::render_terminal(&message));

    if let Some(path) = cli.output {
        output::save(&path, &message)?;
        println!("Results saved to: {}", path.display());
    }

    Ok(())
}
