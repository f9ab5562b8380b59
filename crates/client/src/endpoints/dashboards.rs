//! Dashboard configuration API endpoints.

use reqwest::Client;
use dynatrace_config::constants::AUTHORIZATION_HEADER;

use crate::endpoints::{api_token_header, decode_json, encode_path_segment, send_request};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{Dashboard, DashboardList, DashboardStub};

const DASHBOARDS_PATH: &str = "/api/config/v1/dashboards";

/// List all dashboards of the tenant.
pub async fn list_dashboards(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<DashboardStub>> {
    let url = format!("{}{}", base_url, DASHBOARDS_PATH);

    let builder = client
        .get(&url)
        .header(AUTHORIZATION_HEADER, api_token_header(auth_token));
    let response = send_request(builder, DASHBOARDS_PATH, "GET", metrics).await?;

    let list: DashboardList = decode_json(response).await?;
    Ok(list.dashboards)
}

/// Fetch a dashboard as raw JSON.
///
/// The raw document is what callers persist and compare for change detection.
pub async fn get_dashboard_json(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    dashboard_id: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<serde_json::Value> {
    let url = format!(
        "{}{}/{}",
        base_url,
        DASHBOARDS_PATH,
        encode_path_segment(dashboard_id)
    );

    let builder = client
        .get(&url)
        .header(AUTHORIZATION_HEADER, api_token_header(auth_token));
    let response = send_request(
        builder,
        "/api/config/v1/dashboards/{id}",
        "GET",
        metrics,
    )
    .await?;

    decode_json(response).await
}

/// Fetch and decode a dashboard.
pub async fn get_dashboard(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    dashboard_id: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Dashboard> {
    let raw = get_dashboard_json(client, base_url, auth_token, dashboard_id, metrics).await?;
    decode_dashboard(raw)
}

/// Decode a raw dashboard document.
pub fn decode_dashboard(raw: serde_json::Value) -> Result<Dashboard> {
    serde_json::from_value(raw).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
