//! App Store Connect API tokens
//!
//! Tokens are ES256 JWTs signed with the team's .p8 key. One is issued per run
//! and never refreshed; it stays valid for 19 minutes from its (backdated)
//! issue time.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConnectConfig;
use crate::error::{ConnectError, Result};

/// Audience claim expected by App Store Connect
pub const AUDIENCE: &str = "appstoreconnect-v1";

/// Lifetime of an issued token, measured from `iat`
pub const TOKEN_LIFETIME: Duration = Duration::minutes(19);

/// How far `iat` is backdated to tolerate clock skew
pub const CLOCK_SKEW: Duration = Duration::seconds(20);

/// JWT claims for App Store Connect API
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) iss: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
    pub(crate) aud: String,
}

/// A signed bearer token
#[derive(Clone)]
pub struct Credential {
    token: String,
    /// Issuer ID
    pub issuer_id: String,
    /// Key ID
    pub key_id: String,
    /// Backdated issue time
    pub issued_at: DateTime<Utc>,
    /// Expiry time
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("issuer_id", &self.issuer_id)
            .field("key_id", &self.key_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl Credential {
    /// The encoded JWT
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Fail if the token can no longer be used
    pub fn ensure_valid(&self) -> Result<()> {
        if self.is_expired_at(Utc::now()) {
            return Err(ConnectError::CredentialExpired(self.expires_at));
        }
        Ok(())
    }
}

/// Signs App Store Connect tokens
pub struct TokenIssuer {
    issuer_id: String,
    key_id: String,
    key: EncodingKey,
}

impl TokenIssuer {
    /// Validate the identifiers and parse the PEM key
    pub fn new(issuer_id: &str, key_id: &str, private_key_pem: &str) -> Result<Self> {
        if issuer_id.trim().is_empty() {
            return Err(ConnectError::ConfigurationError(
                "issuer ID is empty".to_string(),
            ));
        }
        if key_id.trim().is_empty() {
            return Err(ConnectError::ConfigurationError("key ID is empty".to_string()));
        }

        let key = EncodingKey::from_ec_pem(private_key_pem.as_bytes())
            .map_err(|e| ConnectError::InvalidCredentials(format!("Invalid API key: {}", e)))?;

        Ok(Self {
            issuer_id: issuer_id.to_string(),
            key_id: key_id.to_string(),
            key,
        })
    }

    pub fn from_config(config: &ConnectConfig) -> Result<Self> {
        Self::new(&config.issuer_id, &config.key_id, &config.private_key)
    }

    /// Issue a token generated now
    pub fn issue(&self) -> Result<Credential> {
        self.issue_at(Utc::now())
    }

    /// Issue a token as if generated at `now`
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<Credential> {
        let issued_at = now - CLOCK_SKEW;
        let expires_at = issued_at + TOKEN_LIFETIME;

        let claims = Claims {
            iss: self.issuer_id.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            aud: AUDIENCE.to_string(),
        };

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.key_id.clone());

        let token = encode(&header, &claims, &self.key)?;
        debug!(key_id = %self.key_id, %expires_at, "issued API token");

        Ok(Credential {
            token,
            issuer_id: self.issuer_id.clone(),
            key_id: self.key_id.clone(),
            issued_at,
            expires_at,
        })
    }
}
