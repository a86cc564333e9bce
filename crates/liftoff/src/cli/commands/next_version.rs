//! nextversion command - Set the next build number on the local project

use clap::Args;
use console::style;
use tracing::info;

use liftoff_connect::{Release, VersionBumper};

use crate::cli::{output, Cli, OutputFormat};

/// Set the project build number to the highest uploaded build plus one
#[derive(Debug, Args)]
pub struct NextVersionCommand {
    /// Program used to set the build number
    #[arg(long, env = "LIFTOFF_VERSION_TOOL", default_value = liftoff_connect::bump::AGVTOOL)]
    pub tool: String,

    /// Print the next build number without changing the project
    #[arg(long)]
    pub dry_run: bool,
}

impl NextVersionCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        super::runtime()?.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(tool = %self.tool, dry_run = self.dry_run, "executing nextversion command");
        let (config, api) = super::connect(cli)?;
        let release = Release::for_bundle(&api, &config.bundle_id).await?;

        if self.dry_run {
            let version = release.next_version().await?;
            if cli.format == OutputFormat::Json {
                let json = serde_json::json!({
                    "app_id": release.app().id,
                    "next_version": version,
                    "dry_run": true,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else if cli.quiet {
                println!("{}", version);
            } else {
                output::info(&format!(
                    "Next build number for {}: {}",
                    config.bundle_id,
                    style(version).green().bold()
                ));
            }
            return Ok(());
        }

        let bumper = VersionBumper::new(&self.tool);
        let result = release.bump_version(&bumper).await?;

        if cli.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", result.stdout);
            if !cli.quiet {
                output::success(&format!(
                    "Build number set to {}",
                    style(result.version).green().bold()
                ));
            }
        }

        Ok(())
    }
}
