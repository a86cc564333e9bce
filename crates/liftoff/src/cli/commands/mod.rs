//! CLI commands

mod next_version;

pub use next_version::NextVersionCommand;
pub use release_to_test::ReleaseToTestCommand;

use liftoff_connect::{AppStoreConnect, ConnectConfig, TokenIssuer};
use tracing::info;

use crate::cli::Cli;

/// Load configuration and build an authenticated client for this run
fn connect(cli: &Cli) -> anyhow::Result<(ConnectConfig, AppStoreConnect)> {
    let config = ConnectConfig::load(&cli.env_file)?;
    let credential = TokenIssuer::from_config(&config)?.issue()?;
    info!(expires_at = %credential.expires_at, "issued App Store Connect token");
    Ok((config, AppStoreConnect::new(credential)))
}

/// Runtime for a command; every API call is awaited in sequence
fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
