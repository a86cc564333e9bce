//! App Store Connect resource types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConnectError, Result};

/// Build platform as used by `filter[preReleaseVersion.platform]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Ios,
    MacOs,
}

impl Platform {
    /// Every platform, in poll order
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::MacOs];

    /// Value sent in API filters
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::Ios => "IOS",
            Self::MacOs => "MAC_OS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// App record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    /// Internal App Store Connect ID
    pub id: String,
    /// Bundle identifier
    pub bundle_id: String,
    /// Display name
    pub name: Option<String>,
}

/// Build processing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildProcessingState {
    Processing,
    Failed,
    Invalid,
    Valid,
}

impl BuildProcessingState {
    pub(crate) fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "PROCESSING" => Self::Processing,
            "FAILED" => Self::Failed,
            "INVALID" => Self::Invalid,
            "VALID" => Self::Valid,
            _ => Self::Processing,
        }
    }

    /// Whether processing has finished unsuccessfully
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Invalid)
    }
}

impl fmt::Display for BuildProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processing => "PROCESSING",
            Self::Failed => "FAILED",
            Self::Invalid => "INVALID",
            Self::Valid => "VALID",
        };
        f.write_str(s)
    }
}

/// Uploaded build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    /// Build ID
    pub id: String,
    /// Build version (CFBundleVersion)
    pub version: String,
    /// Processing state
    pub processing_state: BuildProcessingState,
    /// Upload timestamp
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Build {
    /// Parse the version as a build number
    pub fn version_number(&self) -> Result<u64> {
        self.version
            .trim()
            .parse()
            .map_err(|_| ConnectError::InvalidBuildVersion {
                build_id: self.id.clone(),
                version: self.version.clone(),
            })
    }
}

/// A build that finished processing as VALID
///
/// Only obtainable through [`ValidatedBuild::new`], so anything holding one
/// can be attached to tester groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedBuild {
    pub platform: Platform,
    #[serde(flatten)]
    build: Build,
}

impl ValidatedBuild {
    pub fn new(platform: Platform, build: Build) -> Result<Self> {
        if build.processing_state != BuildProcessingState::Valid {
            return Err(ConnectError::BuildNotValid {
                build_id: build.id,
                state: build.processing_state,
            });
        }
        Ok(Self { platform, build })
    }

    pub fn id(&self) -> &str {
        &self.build.id
    }

    pub fn build(&self) -> &Build {
        &self.build
    }
}

/// Beta group information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetaGroup {
    /// Group ID
    pub id: String,
    /// Group name
    pub name: String,
    /// Whether this is an internal group
    pub is_internal: bool,
}
