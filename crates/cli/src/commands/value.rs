//! Value command implementation.
//!
//! Resolves a single indicator from the configured custom queries, falling back
//! to the built-in defaults.

use anyhow::{Context, Result};
use dynatrace_client::{PlaceholderResolver, SliResolver, SliResult, TimeWindow};
use dynatrace_config::{Config, DeliveryContext};
use std::path::Path;
use tracing::info;

use crate::formatters::{OutputFormat, emit};

pub async fn run(
    config: Config,
    context: DeliveryContext,
    name: &str,
    window: TimeWindow,
    output_format: &str,
    output_file: Option<&Path>,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let client = super::build_client(&config)?;
    let placeholders = PlaceholderResolver::new(context, config.sli.custom_filters.clone());
    let resolver = SliResolver::new(&client, &placeholders, &config.sli.custom_queries);

    let value = resolver
        .get_sli_value(name, &window)
        .await
        .with_context(|| format!("Failed to resolve indicator '{}'", name))?;
    info!(indicator = %name, value, "Resolved indicator");

    emit(&SliResult::success(name, value), format, output_file)
}
