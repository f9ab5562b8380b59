//! REST API endpoint implementations.
//!
//! Each function takes the shared `reqwest::Client`, the normalized tenant URL and
//! the raw API token, sends exactly one request and decodes the response.

mod dashboards;
mod metrics;
mod problems;
mod request;
mod slo;
pub mod url_encoding;
mod usql;

use dynatrace_config::constants::API_TOKEN_SCHEME;

pub use dashboards::{decode_dashboard, get_dashboard, get_dashboard_json, list_dashboards};
pub use metrics::{describe_metric, query_metrics};
pub use problems::{get_problem, query_problems, query_security_problems};
pub use request::{decode_json, send_request};
pub use slo::get_slo;
pub use url_encoding::encode_path_segment;
pub use usql::query_usql;

/// Value of the `Authorization` header for an API token.
pub(crate) fn api_token_header(auth_token: &str) -> String {
    format!("{} {}", API_TOKEN_SCHEME, auth_token)
}
