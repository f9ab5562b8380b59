//! SLO API v2 endpoint.

use reqwest::Client;
use dynatrace_config::constants::AUTHORIZATION_HEADER;

use crate::endpoints::{api_token_header, decode_json, encode_path_segment, send_request};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::SloResult;
use crate::query::TimeWindow;

/// Evaluate an SLO over `window`.
///
/// # Errors
///
/// Returns `ClientError::SloEvaluation` when the API answers 200 but reports an
/// evaluation error in the body.
pub async fn get_slo(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    slo_id: &str,
    window: &TimeWindow,
    metrics: Option<&MetricsCollector>,
) -> Result<SloResult> {
    let url = format!("{}/api/v2/slo/{}", base_url, encode_path_segment(slo_id));

    let builder = client
        .get(&url)
        .header(AUTHORIZATION_HEADER, api_token_header(auth_token))
        .query(&[("from", window.start_millis()), ("to", window.end_millis())]);
    let response = send_request(builder, "/api/v2/slo/{id}", "GET", metrics).await?;

    let slo: SloResult = decode_json(response).await?;
    if slo.has_error() {
        return Err(ClientError::SloEvaluation {
            slo_id: slo_id.to_string(),
            error: slo.error,
        });
    }
    Ok(slo)
}
