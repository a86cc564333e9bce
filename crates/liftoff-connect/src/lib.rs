//! App Store Connect client for Liftoff
//!
//! Covers the two release chores that follow an upload from Xcode:
//!
//! - **Build numbers**: read the highest build number uploaded so far and set
//!   the next one on the local project via `agvtool`.
//! - **TestFlight distribution**: wait until the latest iOS and macOS builds
//!   finish processing, then attach them to every external beta group.
//!
//! ## Usage
//!
//! ```ignore
//! use liftoff_connect::{AppStoreConnect, ConnectConfig, Release, ReleaseOptions, TokenIssuer};
//!
//! let config = ConnectConfig::load(Path::new("env"))?;
//! let credential = TokenIssuer::from_config(&config)?.issue()?;
//! let api = AppStoreConnect::new(credential);
//!
//! let release = Release::for_bundle(&api, &config.bundle_id).await?;
//! release.release_to_testers(&ReleaseOptions::default()).await?;
//! ```

pub mod apps;
pub mod auth;
pub mod bump;
pub mod client;
pub mod config;
pub mod distributor;
pub mod error;
pub mod poller;
pub mod release;
pub mod types;
pub mod versions;

#[cfg(test)]
mod testing;

pub use auth::{Credential, TokenIssuer};
pub use bump::{BumpOutput, VersionBumper};
pub use client::{AppStoreConnect, ConnectApi};
pub use config::{ConnectConfig, PollPolicy};
pub use distributor::{Attachment, DistributionReport};
pub use error::{ConnectError, ErrorKind, Result};
pub use release::{Release, ReleaseOptions};
pub use types::*;
