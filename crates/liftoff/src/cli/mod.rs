//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{NextVersionCommand, ReleaseToTestCommand};

/// Liftoff - TestFlight build numbers and beta distribution
#[derive(Debug, Parser)]
#[command(name = "liftoff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// KEY=VALUE file with the issuer ID, key ID and bundle ID
    #[arg(
        long,
        global = true,
        env = "LIFTOFF_ENV_FILE",
        default_value = liftoff_connect::config::DEFAULT_ENV_FILE
    )]
    pub env_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Set the project build number to the last uploaded one plus one
    #[command(name = "nextversion")]
    NextVersion(NextVersionCommand),

    /// Wait for the latest builds to process, then send them to external testers
    #[command(name = "releasetotest")]
    ReleaseToTest(ReleaseToTestCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> anyhow::Result<()> {
        match &self.command {
            Some(Commands::NextVersion(cmd)) => cmd.execute(self),
            Some(Commands::ReleaseToTest(cmd)) => cmd.execute(self),
            None => anyhow::bail!("no command"),
        }
    }

    /// Whether human-readable output should be printed
    pub fn show_text(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command() {
        let cli = Cli::try_parse_from(["liftoff"]).unwrap();
        assert!(cli.command.is_none());
        let err = cli.execute().unwrap_err();
        assert_eq!(err.to_string(), "no command");
    }

    #[test]
    fn test_unknown_command() {
        assert!(Cli::try_parse_from(["liftoff", "deploy"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "liftoff",
            "nextversion",
            "--format",
            "json",
            "--env-file",
            "config/env",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.env_file, PathBuf::from("config/env"));
        assert!(cli.quiet);
        assert!(!cli.show_text());
        assert!(matches!(cli.command, Some(Commands::NextVersion(_))));
    }
}
