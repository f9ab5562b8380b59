//! Problems and security problems API v2 endpoints.

use reqwest::Client;
use dynatrace_config::constants::AUTHORIZATION_HEADER;

use crate::endpoints::{api_token_header, decode_json, encode_path_segment, send_request};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{Problem, ProblemQueryResult, SecurityProblemQueryResult};
use crate::query::{QueryParams, TimeWindow};

const PROBLEMS_PATH: &str = "/api/v2/problems";
const SECURITY_PROBLEMS_PATH: &str = "/api/v2/securityProblems";

/// Merge the window into a selector fragment such as `problemSelector=status(open)`.
fn windowed_query(query: &str, window: &TimeWindow) -> Result<String> {
    let mut params = QueryParams::parse(query.trim_start_matches('?'))?;
    params.remove("from");
    params.remove("to");
    params.add("from", window.start_millis());
    params.add("to", window.end_millis());
    Ok(params.encode())
}

/// Count problems matching `query` within `window`.
pub async fn query_problems(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    query: &str,
    window: &TimeWindow,
    metrics: Option<&MetricsCollector>,
) -> Result<ProblemQueryResult> {
    let url = format!(
        "{}{}?{}",
        base_url,
        PROBLEMS_PATH,
        windowed_query(query, window)?
    );

    let builder = client
        .get(&url)
        .header(AUTHORIZATION_HEADER, api_token_header(auth_token));
    let response = send_request(builder, PROBLEMS_PATH, "GET", metrics).await?;

    decode_json(response).await
}

/// Fetch a single problem by id.
pub async fn get_problem(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    problem_id: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Problem> {
    let url = format!(
        "{}{}/{}",
        base_url,
        PROBLEMS_PATH,
        encode_path_segment(problem_id)
    );

    let builder = client
        .get(&url)
        .header(AUTHORIZATION_HEADER, api_token_header(auth_token));
    let response = send_request(builder, "/api/v2/problems/{id}", "GET", metrics).await?;

    decode_json(response).await
}

/// Count security problems matching `query` within `window`.
pub async fn query_security_problems(
    client: &Client,
    base_url: &str,
    auth_token: &str,
    query: &str,
    window: &TimeWindow,
    metrics: Option<&MetricsCollector>,
) -> Result<SecurityProblemQueryResult> {
    let url = format!(
        "{}{}?{}",
        base_url,
        SECURITY_PROBLEMS_PATH,
        windowed_query(query, window)?
    );

    let builder = client
        .get(&url)
        .header(AUTHORIZATION_HEADER, api_token_header(auth_token));
    let response = send_request(builder, SECURITY_PROBLEMS_PATH, "GET", metrics).await?;

    decode_json(response).await
}
