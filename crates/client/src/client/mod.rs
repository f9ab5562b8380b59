//! Main Dynatrace API client and API methods.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `dashboards`: Dashboard listing and retrieval
//! - `metrics`: Metric definitions and metric queries
//! - `problems`: Problems and security problems
//! - `slo`: SLO evaluation
//! - `usql`: User session queries
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Turning dashboards into SLIs (see [`crate::sli`])
//!
//! # Invariants
//! - Every call is sent exactly once; there is no retry or session refresh.
//! - The API token is only exposed when a request header is built.

pub mod builder;

mod dashboards;
mod metrics;
mod problems;
mod slo;
mod usql;

use secrecy::{ExposeSecret, SecretString};

use crate::metrics::MetricsCollector;

/// Dynatrace API client for one tenant.
///
/// Use [`DynatraceClient::builder()`] to create a new client:
///
/// ```rust,ignore
/// use dynatrace_client::DynatraceClient;
/// use secrecy::SecretString;
///
/// let client = DynatraceClient::builder()
///     .base_url("https://abc12345.live.dynatrace.com".to_string())
///     .api_token(SecretString::new("dt0c01.sample".to_string().into()))
///     .build()?;
/// ```
pub struct DynatraceClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) api_token: SecretString,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl std::fmt::Debug for DynatraceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynatraceClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl DynatraceClient {
    /// Create a new client builder.
    pub fn builder() -> builder::DynatraceClientBuilder {
        builder::DynatraceClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn token(&self) -> &str {
        self.api_token.expose_secret()
    }
}
