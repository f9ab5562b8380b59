//! Slis command implementation.
//!
//! Responsibilities:
//! - Run one dashboard pass for the configured dashboard reference.
//! - Print the SLI results together with the generated SLI and SLO documents.
//! - Persist the fetched dashboard so the next pass can detect changes.
//!
//! Does NOT handle:
//! - Evaluating objectives against results.

use anyhow::{Context, Result};
use dynatrace_client::{
    DashboardOutcome, DashboardProcessor, PlaceholderResolver, ServiceLevelObjectives,
    SliDocument, SliResult, TimeWindow,
};
use dynatrace_config::{Config, DeliveryContext};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::formatters::{OutputFormat, emit, write_to_file};

/// Printed form of a dashboard pass.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlisOutput {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub results: Vec<SliResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sli: Option<SliDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slo: Option<ServiceLevelObjectives>,
}

impl SlisOutput {
    fn from_outcome(outcome: &DashboardOutcome) -> Self {
        match outcome {
            DashboardOutcome::Skipped => Self {
                status: "skipped",
                dashboard_id: None,
                link: None,
                results: Vec::new(),
                sli: None,
                slo: None,
            },
            DashboardOutcome::Unchanged { link } => Self {
                status: "unchanged",
                dashboard_id: None,
                link: Some(link.clone()),
                results: Vec::new(),
                sli: None,
                slo: None,
            },
            DashboardOutcome::Processed(processed) => Self {
                status: "processed",
                dashboard_id: Some(processed.dashboard_id.clone()),
                link: Some(processed.link.clone()),
                results: processed.sli.results.clone(),
                sli: Some(processed.sli.indicators.clone()),
                slo: Some(processed.sli.objectives.clone()),
            },
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: Config,
    context: DeliveryContext,
    window: TimeWindow,
    stored: Option<PathBuf>,
    save_dashboard: Option<PathBuf>,
    output_format: &str,
    output_file: Option<&Path>,
) -> Result<()> {
    let format = OutputFormat::from_str(output_format)?;
    let stored = stored.as_deref().map(read_snapshot).transpose()?.flatten();

    let client = super::build_client(&config)?;
    let placeholders = PlaceholderResolver::new(context, config.sli.custom_filters.clone());
    let processor = DashboardProcessor::new(&client, &placeholders);

    let outcome = processor
        .process(&config.sli.dashboard, stored.as_deref(), &window)
        .await
        .context("Dashboard pass failed")?;

    if let DashboardOutcome::Processed(processed) = &outcome {
        info!(
            dashboard = %processed.dashboard_id,
            indicators = processed.sli.results.len(),
            "Processed dashboard"
        );
        if let Some(path) = &save_dashboard {
            let snapshot = serde_json::to_string_pretty(&processed.raw_dashboard)?;
            write_to_file(&snapshot, path)?;
        }
    }

    emit(&SlisOutput::from_outcome(&outcome), format, output_file)
}

/// Contents of a stored snapshot; a missing file means no snapshot yet.
fn read_snapshot(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read dashboard snapshot: {}", path.display()))
        }
    }
}
