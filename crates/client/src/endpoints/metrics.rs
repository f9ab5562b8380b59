//! Metrics API v2 endpoints.

use reqwest::Client;
use dynatrace_config::constants::AUTHORIZATION_HEADER;

use crate::endpoints::{api_token_header, decode_json, encode_path_segment, send_request};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{MetricDefinition, MetricsQueryResult};
use crate::query::MetricsQuery;
use crate::query::metrics::METRICS_QUERY_PATH;

/// Fetch the definition of a metric (unit, dimensions, default aggregation).
///
/// Definitions are not cached; every call hits the API.
pub async fn describe_metric(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    metric_id: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<MetricDefinition> {
    let url = format!(
        "{}/api/v2/metrics/{}",
        base_url,
        encode_path_segment(metric_id)
    );

    let builder = client
        .get(&url)
        .header(AUTHORIZATION_HEADER, api_token_header(auth_token));
    let response = send_request(builder, "/api/v2/metrics/{id}", "GET", metrics).await?;

    decode_json(response).await
}

/// Execute a built metrics query.
///
/// # Errors
///
/// Returns `ClientError::NoData` when the response carries no result collections.
pub async fn query_metrics(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    query: &MetricsQuery,
    metrics: Option<&MetricsCollector>,
) -> Result<MetricsQueryResult> {
    let url = query.url(base_url);
    tracing::debug!(url = %url, "Executing metrics query");

    let builder = client
        .get(&url)
        .header(AUTHORIZATION_HEADER, api_token_header(auth_token))
        .header(reqwest::header::CONTENT_TYPE, "application/json");
    let response = send_request(builder, METRICS_QUERY_PATH, "GET", metrics).await?;

    let result: MetricsQueryResult = decode_json(response).await?;
    if result.result.is_empty() {
        return Err(ClientError::NoData(
            "Dynatrace Metrics API returned no DataPoints".to_string(),
        ));
    }
    Ok(result)
}
