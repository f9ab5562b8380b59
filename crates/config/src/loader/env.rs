//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse environment variables for Dynatrace configuration.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Building the final Config (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Values already set on the loader are not overwritten.
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace and newlines removed).
//! - Invalid boolean or numeric values return ConfigError::InvalidValue.
//! - Only variable names are logged, never values.

use secrecy::SecretString;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    let value = std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    });
    if value.is_some() {
        tracing::debug!(var = key, "Using value from environment");
    }
    value
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        message: "must be true or false".to_string(),
    })
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if loader.tenant().is_none() {
        if let Some(tenant) = env_var_or_none("DT_TENANT") {
            loader.set_tenant(Some(tenant));
        }
    }
    if !loader.has_api_token() {
        if let Some(token) = env_var_or_none("DT_API_TOKEN") {
            loader.set_api_token(Some(SecretString::new(token.into())));
        }
    }
    if loader.skip_verify().is_none() {
        if let Some(skip) = env_var_or_none("DT_SKIP_VERIFY") {
            loader.set_skip_verify(Some(parse_bool("DT_SKIP_VERIFY", &skip)?));
        } else if let Some(verify) = env_var_or_none("HTTP_SSL_VERIFY") {
            loader.set_skip_verify(Some(!parse_bool("HTTP_SSL_VERIFY", &verify)?));
        }
    }
    if loader.timeout().is_none() {
        if let Some(timeout) = env_var_or_none("DT_TIMEOUT") {
            let secs: u64 = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                var: "DT_TIMEOUT".to_string(),
                message: "must be a number".to_string(),
            })?;
            loader.set_timeout(Some(Duration::from_secs(secs)));
        }
    }
    if loader.proxy().is_none() {
        if let Some(proxy) = env_var_or_none("DT_PROXY") {
            loader.set_proxy(Some(proxy));
        }
    }
    if loader.dashboard().is_none() {
        if let Some(dashboard) = env_var_or_none("DT_DASHBOARD") {
            loader.set_dashboard(Some(dashboard));
        }
    }

    Ok(())
}
