//! User session query language (USQL) endpoint.

use reqwest::Client;
use dynatrace_config::constants::AUTHORIZATION_HEADER;

use crate::endpoints::{api_token_header, decode_json, send_request};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::UsqlResult;
use crate::query::usql::USQL_TABLE_PATH;

/// Execute an encoded USQL table query (see `build_usql_query`).
///
/// # Errors
///
/// Returns `ClientError::NoData` when the table has no rows.
pub async fn query_usql(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    encoded_query: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<UsqlResult> {
    let url = format!("{}{}?{}", base_url, USQL_TABLE_PATH, encoded_query);

    let builder = client
        .get(&url)
        .header(AUTHORIZATION_HEADER, api_token_header(auth_token));
    let response = send_request(builder, USQL_TABLE_PATH, "GET", metrics).await?;

    let result: UsqlResult = decode_json(response).await?;
    if result.values.is_empty() {
        return Err(ClientError::NoData(
            "Dynatrace USQL Query didn't return any DataPoints".to_string(),
        ));
    }
    Ok(result)
}
