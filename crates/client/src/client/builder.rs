//! Client builder for constructing [`DynatraceClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating required configuration (base_url, api_token)
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, TLS verification, proxy, extra headers)
//!
//! # What this module does NOT handle:
//! - Actual API calls (handled by [`DynatraceClient`] methods)
//! - Reading credentials from the environment (handled by `dynatrace_config::ConfigLoader`)
//!
//! # Invariants
//! - `base_url` and `api_token` must be provided before calling `build()`
//! - The base URL is always normalized to have no trailing slashes
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning
//! - The `Authorization` header is always derived from the API token, never from extra headers

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::SecretString;

use crate::client::DynatraceClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use dynatrace_config::{
    Config,
    constants::{AUTHORIZATION_HEADER, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS},
};

/// Builder for creating a new [`DynatraceClient`].
///
/// # Example
///
/// ```rust,ignore
/// use dynatrace_client::DynatraceClient;
/// use secrecy::SecretString;
///
/// let client = DynatraceClient::builder()
///     .base_url("https://abc12345.live.dynatrace.com".to_string())
///     .api_token(SecretString::new("dt0c01.sample".to_string().into()))
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// ```
pub struct DynatraceClientBuilder {
    base_url: Option<String>,
    api_token: Option<SecretString>,
    extra_headers: BTreeMap<String, String>,
    skip_verify: bool,
    timeout: Duration,
    proxy: Option<String>,
    metrics: Option<MetricsCollector>,
}

impl Default for DynatraceClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            extra_headers: BTreeMap::new(),
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxy: None,
            metrics: None,
        }
    }
}

impl DynatraceClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tenant URL, e.g. `https://abc12345.live.dynatrace.com`.
    ///
    /// Trailing slashes will be automatically removed.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the API token sent as `Authorization: Api-Token <token>`.
    pub fn api_token(mut self, token: SecretString) -> Self {
        self.api_token = Some(token);
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this for tenants with self-signed certificates. Disabling TLS
    /// verification makes the connection vulnerable to man-in-the-middle attacks.
    ///
    /// # Note
    /// This only affects HTTPS connections. For HTTP URLs, a warning is logged
    /// but no error occurs.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the request timeout.
    ///
    /// Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route all requests through a proxy.
    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Set the metrics collector for API call performance tracking.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a client builder from configuration.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use dynatrace_client::DynatraceClient;
    /// use dynatrace_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new().from_env()?.build()?;
    /// let client = DynatraceClient::builder()
    ///     .from_config(&config)
    ///     .build()?;
    /// ```
    pub fn from_config(mut self, config: &Config) -> Self {
        self.base_url = Some(config.connection.base_url.clone());
        self.api_token = Some(config.auth.api_token.clone());
        self.extra_headers = config.auth.extra_headers.clone();
        self.skip_verify = config.connection.skip_verify;
        self.timeout = config.connection.timeout;
        self.proxy = config.connection.proxy.clone();
        self
    }

    /// Normalize a base URL by removing trailing slashes.
    ///
    /// - `"https://abc.live.dynatrace.com/"` -> `"https://abc.live.dynatrace.com"`
    /// - `"https://abc.live.dynatrace.com//"` -> `"https://abc.live.dynatrace.com"`
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    fn default_headers(extra: &BTreeMap<String, String>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in extra {
            if name.eq_ignore_ascii_case(AUTHORIZATION_HEADER) {
                continue;
            }
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ClientError::InvalidConfig(format!("invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ClientError::InvalidConfig(format!("invalid value for header '{}': {}", name, e))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Build the [`DynatraceClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `base_url` was not provided or the proxy is malformed.
    /// Returns [`ClientError::InvalidConfig`] if `api_token` was not provided, an extra
    /// header is malformed or the HTTP client fails to build.
    pub fn build(self) -> Result<DynatraceClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;
        let base_url = Self::normalize_base_url(base_url);

        let api_token = self
            .api_token
            .ok_or_else(|| ClientError::InvalidConfig("api_token is required".to_string()))?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS))
            .default_headers(Self::default_headers(&self.extra_headers)?);

        if let Some(proxy) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| ClientError::InvalidUrl(format!("proxy {}: {}", proxy, e)))?;
            http_builder = http_builder.proxy(proxy);
        }

        if self.skip_verify {
            let is_https = base_url.starts_with("https://");
            if is_https {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                // No TLS layer on plain HTTP.
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))?;

        Ok(DynatraceClient {
            http,
            base_url,
            api_token,
            metrics: self.metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> SecretString {
        SecretString::new("dt0c01.test-token".to_string().into())
    }

    #[test]
    fn test_from_config_with_api_token() {
        let config = Config::with_api_token("abc12345.live.dynatrace.com", token());

        let client = DynatraceClient::builder().from_config(&config).build();

        assert!(client.is_ok());
        let client = client.unwrap();
        assert_eq!(client.base_url(), "https://abc12345.live.dynatrace.com");
    }

    #[test]
    fn test_from_config_preserves_settings() {
        let mut config = Config::with_api_token("https://abc12345.live.dynatrace.com", token());
        config.connection.skip_verify = true;
        config.connection.timeout = Duration::from_secs(120);
        config.connection.proxy = Some("http://proxy.local:3128".to_string());
        config
            .auth
            .extra_headers
            .insert("X-Tenant-Tag".to_string(), "qg".to_string());

        let builder = DynatraceClient::builder().from_config(&config);

        assert_eq!(
            builder.base_url,
            Some("https://abc12345.live.dynatrace.com".to_string())
        );
        assert!(builder.skip_verify);
        assert_eq!(builder.timeout, Duration::from_secs(120));
        assert_eq!(builder.proxy.as_deref(), Some("http://proxy.local:3128"));
        assert_eq!(builder.extra_headers.get("X-Tenant-Tag").map(String::as_str), Some("qg"));
    }

    #[test]
    fn test_missing_base_url() {
        let client = DynatraceClient::builder().api_token(token()).build();
        assert!(matches!(client.unwrap_err(), ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_missing_api_token() {
        let client = DynatraceClient::builder()
            .base_url("https://abc12345.live.dynatrace.com".to_string())
            .build();
        assert!(matches!(client.unwrap_err(), ClientError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let client = DynatraceClient::builder()
            .base_url("https://abc12345.live.dynatrace.com".to_string())
            .api_token(token())
            .header("bad header", "x")
            .build();
        assert!(matches!(client.unwrap_err(), ClientError::InvalidConfig(_)));
    }

    #[test]
    fn test_authorization_extra_header_ignored() {
        let mut extra = BTreeMap::new();
        extra.insert("authorization".to_string(), "Bearer other".to_string());
        extra.insert("X-Trace".to_string(), "1".to_string());
        let headers = DynatraceClientBuilder::default_headers(&extra).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-trace").unwrap(), "1");
    }

    #[test]
    fn test_normalize_base_url_trailing_slash() {
        let input = "https://abc12345.live.dynatrace.com/".to_string();
        assert_eq!(
            DynatraceClientBuilder::normalize_base_url(input),
            "https://abc12345.live.dynatrace.com"
        );
    }

    #[test]
    fn test_normalize_base_url_no_trailing_slash() {
        let input = "https://abc12345.live.dynatrace.com".to_string();
        assert_eq!(
            DynatraceClientBuilder::normalize_base_url(input),
            "https://abc12345.live.dynatrace.com"
        );
    }

    #[test]
    fn test_normalize_base_url_multiple_trailing_slashes() {
        let input = "https://managed.example.com/e/abc//".to_string();
        assert_eq!(
            DynatraceClientBuilder::normalize_base_url(input),
            "https://managed.example.com/e/abc"
        );
    }

    #[test]
    fn test_skip_verify_with_https_url() {
        let client = DynatraceClient::builder()
            .base_url("https://abc12345.live.dynatrace.com".to_string())
            .api_token(token())
            .skip_verify(true)
            .build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_skip_verify_with_http_url() {
        // Succeeds, logs a warning.
        let client = DynatraceClient::builder()
            .base_url("http://localhost:8080".to_string())
            .api_token(token())
            .skip_verify(true)
            .build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let client = DynatraceClient::builder()
            .base_url("https://abc12345.live.dynatrace.com".to_string())
            .api_token(token())
            .proxy(Some("http://bad host:3128".to_string()))
            .build();
        assert!(matches!(client.unwrap_err(), ClientError::InvalidUrl(_)));
    }
}
