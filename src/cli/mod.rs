//! CLI entry point for portability-auth.

pub mod handlers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Portability OAuth callback CLI
#[derive(Parser, Debug)]
#[command(
    name = "portability-auth",
    version,
    about = "Handle OAuth callbacks for data-portability jobs"
)]
pub struct Cli {
    /// Config file (default: ~/.portability/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a provider redirect URL and print the authorization response
    Parse(ParseArgs),
    /// Handle a provider redirect against the configured job store
    Handle(HandleArgs),
    /// Inspect stored jobs
    Job(JobArgs),
}

/// Arguments for `portability-auth parse`.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Full redirect URL including its query string
    pub url: String,
}

/// Arguments for `portability-auth handle`.
#[derive(Parser, Debug)]
pub struct HandleArgs {
    /// Full redirect URL including its query string
    pub url: String,

    /// Override the credential exchange timeout (0 = unbounded)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Arguments for the `job` subcommand group.
#[derive(Parser, Debug)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommands,
}

/// Job subcommands.
#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Show a stored job with credentials redacted
    Show(ShowArgs),
}

/// Arguments for `portability-auth job show`.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Job token
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_handle_with_timeout() {
        let cli = Cli::try_parse_from([
            "portability-auth",
            "handle",
            "https://p.example/callback?code=x&state=t",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Handle(args) => {
                assert_eq!(args.url, "https://p.example/callback?code=x&state=t");
                assert_eq!(args.timeout_secs, Some(5));
            }
            other => panic!("expected Handle, got {other:?}"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "portability-auth",
            "job",
            "show",
            "abc123",
            "--config",
            "/etc/portability.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/portability.toml")));
        match cli.command {
            Commands::Job(job) => match job.command {
                JobCommands::Show(args) => assert_eq!(args.token, "abc123"),
            },
            other => panic!("expected Job, got {other:?}"),
        }
    }

    #[test]
    fn parse_requires_url() {
        assert!(Cli::try_parse_from(["portability-auth", "parse"]).is_err());
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["portability-auth"]).is_err());
    }
}
