//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` merging builder values, env vars and
//!   configuration file content.
//! - Build the final immutable `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Parsing YAML content (see `files` module).
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.
//! - The built `base_url` is an absolute http(s) URL without a trailing slash.

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
use crate::files::{DynatraceConfigFile, SliFile};
use crate::types::connection::normalize_tenant_url;
use crate::types::{
    AuthConfig, Config, ConnectionConfig, DashboardReference, SliFilter, SliSettings,
};

/// Configuration loader that builds config from builder values and environment variables.
#[derive(Default)]
pub struct ConfigLoader {
    tenant: Option<String>,
    api_token: Option<SecretString>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    proxy: Option<String>,
    dashboard: Option<String>,
    extra_headers: BTreeMap<String, String>,
    custom_queries: BTreeMap<String, String>,
    custom_filters: Vec<SliFilter>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            tracing::debug!("DOTENV_DISABLED is set, skipping .env file");
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "Loaded .env file");
                Ok(self)
            }
            Err(e) if Self::is_not_found(&e) => {
                tracing::debug!("No .env file found");
                Ok(self)
            }
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from environment variables.
    ///
    /// Only fills values not already set through builder methods.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Apply the dashboard setting of a `dynatrace.conf.yaml` file.
    ///
    /// The file never overrides a dashboard that is already set.
    pub fn with_dynatrace_config_file(mut self, file: &DynatraceConfigFile) -> Self {
        if self.dashboard.is_none() {
            self.dashboard = file.dashboard.clone();
        }
        self
    }

    /// Add the indicators of an `sli.yaml` file as custom queries.
    pub fn with_sli_file(mut self, file: &SliFile) -> Self {
        self.custom_queries.extend(
            file.indicators
                .iter()
                .map(|(name, query)| (name.clone(), query.clone())),
        );
        self
    }

    /// Set the tenant (host or URL).
    pub fn with_tenant(mut self, tenant: String) -> Self {
        self.tenant = Some(tenant);
        self
    }

    /// Set the API token.
    pub fn with_api_token(mut self, token: String) -> Self {
        self.api_token = Some(SecretString::new(token.into()));
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set the dashboard setting (`""`, `"query"` or a dashboard id).
    pub fn with_dashboard(mut self, dashboard: String) -> Self {
        self.dashboard = Some(dashboard);
        self
    }

    /// Add a static header sent with every request.
    pub fn with_extra_header(mut self, name: String, value: String) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// Add a custom placeholder filter.
    pub fn with_custom_filter(mut self, key: String, value: String) -> Self {
        self.custom_filters.push(SliFilter { key, value });
        self
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let base_url = self
            .tenant
            .as_deref()
            .map(validate_and_normalize_tenant)
            .transpose()?
            .ok_or(ConfigError::MissingTenant)?;

        let api_token = self
            .api_token
            .filter(|token| !token.expose_secret().trim().is_empty())
            .map(|token| SecretString::new(token.expose_secret().trim().to_string().into()))
            .ok_or(ConfigError::MissingApiToken)?;

        let proxy = self
            .proxy
            .as_deref()
            .map(|proxy| validate_url("DT_PROXY", proxy))
            .transpose()?;

        let connection = ConnectionConfig {
            base_url,
            skip_verify: self.skip_verify.unwrap_or(false),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            proxy,
        };

        Self::validate_timeout(&connection)?;

        Ok(Config {
            connection,
            auth: AuthConfig {
                api_token,
                extra_headers: self.extra_headers,
            },
            sli: SliSettings {
                dashboard: self
                    .dashboard
                    .as_deref()
                    .map(DashboardReference::from_setting)
                    .unwrap_or_default(),
                custom_queries: self.custom_queries,
                custom_filters: self.custom_filters,
            },
        })
    }

    fn validate_timeout(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        let timeout_secs = connection.timeout.as_secs();

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }

        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "timeout exceeds maximum allowed value of {} seconds",
                    MAX_TIMEOUT_SECS
                ),
            });
        }

        Ok(())
    }

    // Internal accessor methods for use by other loader modules

    pub(crate) fn tenant(&self) -> Option<&String> {
        self.tenant.as_ref()
    }

    pub(crate) fn has_api_token(&self) -> bool {
        self.api_token.is_some()
    }

    pub(crate) fn skip_verify(&self) -> Option<bool> {
        self.skip_verify
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn proxy(&self) -> Option<&String> {
        self.proxy.as_ref()
    }

    pub(crate) fn dashboard(&self) -> Option<&String> {
        self.dashboard.as_ref()
    }

    pub(crate) fn set_tenant(&mut self, tenant: Option<String>) {
        self.tenant = tenant;
    }

    pub(crate) fn set_api_token(&mut self, token: Option<SecretString>) {
        self.api_token = token;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_proxy(&mut self, proxy: Option<String>) {
        self.proxy = proxy;
    }

    pub(crate) fn set_dashboard(&mut self, dashboard: Option<String>) {
        self.dashboard = dashboard;
    }
}

/// Normalize a tenant value and verify that it is a usable http(s) URL.
fn validate_and_normalize_tenant(tenant: &str) -> Result<String, ConfigError> {
    let normalized = normalize_tenant_url(tenant);
    validate_url("DT_TENANT", &normalized)?;
    Ok(normalized)
}

fn validate_url(var: &str, value: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        var: var.to_string(),
        message: format!("not a valid URL: {}", e),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: "URL has no host".to_string(),
        });
    }

    Ok(value.to_string())
}
