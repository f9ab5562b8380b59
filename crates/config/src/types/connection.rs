//! Connection configuration types for the Dynatrace tenant.
//!
//! Responsibilities:
//! - Define connection settings (tenant URL, TLS verification, timeout, proxy).
//! - Define the main `Config` structure combining connection, auth and SLI settings.
//! - Normalize tenant URLs the way credentials are normalized upstream.
//!
//! Does NOT handle:
//! - Configuration loading from env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - All duration fields are serialized as seconds (integers).
//! - `base_url` never ends with `/` once normalized.

use crate::constants::DEFAULT_TIMEOUT_SECS;
use crate::types::auth::AuthConfig;
use crate::types::sli::SliSettings;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Module for serializing Duration as seconds (integer).
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Connection configuration for a Dynatrace tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Tenant URL (e.g., https://abc12345.live.dynatrace.com)
    pub base_url: String,
    /// Whether to skip TLS verification (for self-signed certificates)
    pub skip_verify: bool,
    /// Request timeout (serialized as seconds)
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
    /// Optional proxy URL for all requests
    #[serde(default)]
    pub proxy: Option<String>,
}

impl ConnectionConfig {
    /// Create a connection config for a tenant with default settings.
    pub fn new(tenant: &str) -> Self {
        Self {
            base_url: normalize_tenant_url(tenant),
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
        }
    }
}

/// Normalize a tenant value into a base URL.
///
/// Surrounding whitespace and newlines are trimmed, trailing slashes are
/// removed and `https://` is assumed when no scheme is present.
pub fn normalize_tenant_url(tenant: &str) -> String {
    let tenant = tenant.trim().trim_end_matches('/');
    if tenant.starts_with("http://") || tenant.starts_with("https://") {
        tenant.to_string()
    } else {
        format!("https://{}", tenant)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Authentication settings
    pub auth: AuthConfig,
    /// SLI retrieval settings
    #[serde(default)]
    pub sli: SliSettings,
}

impl Config {
    /// Create a config with an API token and default settings.
    pub fn with_api_token(tenant: &str, api_token: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(tenant),
            auth: AuthConfig::with_api_token(api_token),
            sli: SliSettings::default(),
        }
    }
}
