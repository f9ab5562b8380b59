//! Command implementations.

pub mod dashboards;
pub mod slis;
pub mod value;

use anyhow::{Context, Result};
use dynatrace_client::{DynatraceClient, MetricsCollector};
use dynatrace_config::Config;

/// Build an API client for `config` with request metrics enabled.
pub(crate) fn build_client(config: &Config) -> Result<DynatraceClient> {
    DynatraceClient::builder()
        .from_config(config)
        .metrics(MetricsCollector::new())
        .build()
        .context("Failed to build Dynatrace client")
}
