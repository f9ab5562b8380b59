//! Dashboards command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::formatters::{OutputFormat, emit};

pub async fn run(
    config: dynatrace_config::Config,
    output_format: &str,
    output_file: Option<&Path>,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let client = super::build_client(&config)?;

    let dashboards = client
        .list_dashboards()
        .await
        .context("Failed to list dashboards")?;
    info!(count = dashboards.len(), "Listed dashboards");

    emit(&dashboards, format, output_file)
}
