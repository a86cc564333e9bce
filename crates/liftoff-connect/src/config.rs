//! Run configuration
//!
//! Identifiers come from a `KEY=VALUE` env file; the private key comes from the
//! `PRIVATE_KEY_BASE64` environment variable. Both are resolved once and handed
//! to the components as an immutable [`ConnectConfig`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use base64::Engine;
use tracing::{debug, info};

use crate::error::{ConnectError, Result};

/// Env file key holding the API issuer ID
pub const ISSUER_ID_KEY: &str = "APP_STORE_CONNECT_API_ISSUER_ID";
/// Env file key holding the API key ID
pub const KEY_ID_KEY: &str = "APP_STORE_CONNECT_API_KEY_ID";
/// Env file key holding the bundle identifier
pub const BUNDLE_ID_KEY: &str = "BUNDLE_ID";
/// Environment variable holding the base64-encoded .p8 key
pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY_BASE64";

/// Default env file name, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = "env";

/// Immutable settings shared by every component in a run
#[derive(Clone)]
pub struct ConnectConfig {
    /// API Key Issuer ID
    pub issuer_id: String,
    /// App Store Connect API Key ID
    pub key_id: String,
    /// Bundle identifier of the app to release
    pub bundle_id: String,
    /// PEM contents of the .p8 key
    pub private_key: String,
}

impl fmt::Debug for ConnectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectConfig")
            .field("issuer_id", &self.issuer_id)
            .field("key_id", &self.key_id)
            .field("bundle_id", &self.bundle_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl ConnectConfig {
    /// Load from an env file plus the `PRIVATE_KEY_BASE64` variable
    pub fn load(env_file: &Path) -> Result<Self> {
        info!(path = %env_file.display(), "loading env file");
        let entries = read_env_file(env_file)?;

        let encoded_key = std::env::var(PRIVATE_KEY_VAR).map_err(|_| {
            ConnectError::ConfigurationError(format!("{} not set", PRIVATE_KEY_VAR))
        })?;

        Self::from_entries(&entries, &encoded_key)
    }

    /// Build from already-parsed env entries and a base64 private key
    pub fn from_entries(entries: &HashMap<String, String>, encoded_key: &str) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            entries
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    ConnectError::ConfigurationError(format!("{} missing from env file", key))
                })
        };

        let issuer_id = required(ISSUER_ID_KEY)?;
        let key_id = required(KEY_ID_KEY)?;
        let bundle_id = required(BUNDLE_ID_KEY)?;
        let private_key = decode_private_key(encoded_key)?;

        debug!(%issuer_id, %key_id, %bundle_id, "configuration resolved");

        Ok(Self {
            issuer_id,
            key_id,
            bundle_id,
            private_key,
        })
    }
}

/// Read `KEY=VALUE` lines without touching the process environment
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Err(ConnectError::ConfigurationError(format!(
            "env file not found: {}",
            path.display()
        )));
    }

    let mut entries = HashMap::new();
    for item in dotenv::from_path_iter(path)? {
        let (key, value) = item?;
        entries.insert(key, value);
    }
    Ok(entries)
}

fn decode_private_key(encoded: &str) -> Result<String> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
    String::from_utf8(bytes).map_err(|e| {
        ConnectError::ConfigurationError(format!(
            "{} is not UTF-8 PEM text: {}",
            PRIVATE_KEY_VAR, e
        ))
    })
}

/// How the build poller waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Sleep between unsuccessful rounds
    pub interval: Duration,
    /// Polling rounds before giving up; `None` polls forever
    pub max_attempts: Option<u32>,
}

impl PollPolicy {
    /// Default interval between polls
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
    /// Default round limit (about an hour at the default interval)
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 360;

    /// Build a policy where `max_attempts == 0` means unbounded
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: (max_attempts > 0).then_some(max_attempts),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_ATTEMPTS)
    }
}
