//! Applying a build number to the local Xcode project

use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{ConnectError, Result};

/// Default version tool
pub const AGVTOOL: &str = "agvtool";

/// Output of a version tool run
#[derive(Debug, Clone, Serialize)]
pub struct BumpOutput {
    pub version: u64,
    pub stdout: String,
}

/// Runs `agvtool new-version -all <N>` (or a drop-in replacement)
#[derive(Debug, Clone)]
pub struct VersionBumper {
    program: String,
}

impl Default for VersionBumper {
    fn default() -> Self {
        Self::new(AGVTOOL)
    }
}

impl VersionBumper {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn args(version: u64) -> Vec<String> {
        vec![
            "new-version".to_string(),
            "-all".to_string(),
            version.to_string(),
        ]
    }

    /// Set the build number on every target
    pub async fn bump(&self, version: u64) -> Result<BumpOutput> {
        let program = which::which(&self.program)
            .map_err(|_| ConnectError::ToolNotFound(self.program.clone()))?;

        info!(program = %program.display(), version, "setting project build version");

        let output = Command::new(&program)
            .args(Self::args(version))
            .output()
            .await
            .map_err(|e| ConnectError::CommandFailed(format!("{} failed: {}", self.program, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);

        debug!("{} stdout: {}", self.program, stdout);
        if !stderr.is_empty() {
            debug!("{} stderr: {}", self.program, stderr);
        }

        if !output.status.success() {
            return Err(ConnectError::CommandFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(BumpOutput { version, stdout })
    }
}
