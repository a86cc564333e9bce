//! Connect error types

use thiserror::Error;

use crate::types::{BuildProcessingState, Platform};

/// Errors raised while talking to App Store Connect or running the release steps
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Invalid credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The signed token is past its expiry
    #[error("Credential expired at {0}; issue a new one")]
    CredentialExpired(chrono::DateTime<chrono::Utc>),

    /// API error from App Store Connect
    #[error("API request failed: {status} - {body}")]
    ApiError { status: u16, body: String },

    /// App not found
    #[error("App not found: {0}")]
    AppNotFound(String),

    /// No builds have been uploaded for the app yet
    #[error("No prior builds found for app {0}")]
    NoPriorBuilds(String),

    /// No build uploaded for a platform
    #[error("Build not found for platform {0}")]
    BuildNotFound(Platform),

    /// Build version string is not an integer
    #[error("Build {build_id} has a non-numeric version: {version}")]
    InvalidBuildVersion { build_id: String, version: String },

    /// Build ended in a terminal state other than VALID
    #[error("Build {build_id} for {platform} finished processing as {state}")]
    BuildProcessingFailed {
        build_id: String,
        platform: Platform,
        state: BuildProcessingState,
    },

    /// Build is not distributable
    #[error("Build {build_id} is {state}, expected VALID")]
    BuildNotValid {
        build_id: String,
        state: BuildProcessingState,
    },

    /// Poll loop gave up
    #[error("Timed out after {attempts} attempts waiting for {platform} build to become valid")]
    Timeout { attempts: u32, platform: Platform },

    /// Tool not found
    #[error("Required tool not found: {0}")]
    ToolNotFound(String),

    /// Command execution failed
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Base64 decoding error
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Env file parse error
    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenv::Error),
}

impl ConnectError {
    /// Broad category used by the CLI to choose an exit code
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationError(_)
            | Self::InvalidCredentials(_)
            | Self::CredentialExpired(_)
            | Self::Jwt(_)
            | Self::Base64(_)
            | Self::EnvFile(_) => ErrorKind::Configuration,
            Self::ApiError { .. } | Self::Http(_) | Self::Json(_) => ErrorKind::Request,
            Self::AppNotFound(_) | Self::NoPriorBuilds(_) | Self::BuildNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Timeout { .. }
            | Self::BuildProcessingFailed { .. }
            | Self::BuildNotValid { .. }
            | Self::InvalidBuildVersion { .. } => ErrorKind::Build,
            Self::ToolNotFound(_) | Self::CommandFailed(_) => ErrorKind::Tool,
            Self::Io(_) => ErrorKind::Other,
        }
    }
}

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Request,
    NotFound,
    Build,
    Tool,
    Other,
}

/// Result type for connect operations
pub type Result<T> = std::result::Result<T, ConnectError>;
