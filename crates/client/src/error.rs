//! Error types for the Dynatrace client and SLI engine.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during Dynatrace client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A query fragment could not be turned into a request URL.
    #[error("Failed to build query: {0}")]
    QueryBuild(String),

    /// The metric definition needed to build a tile query could not be fetched.
    #[error("Failed to describe metric {metric}: {source}")]
    MetricLookup {
        metric: String,
        #[source]
        source: Box<ClientError>,
    },

    /// Non-success response from the Dynatrace API.
    #[error("Dynatrace API returned {} at {url}: {message}", api_error_label(.status, .code))]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
        url: String,
    },

    /// Transport-level failure (DNS, connection, TLS, timeout).
    #[error("Dynatrace API unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The configured or discovered dashboard id is not a v4 UUID.
    #[error("Dashboard ID {0} not a valid UUID")]
    InvalidDashboardId(String),

    /// A replayed metrics query matched more than one data series.
    #[error(
        "Dynatrace Metrics API returned {count} result values, expected 1 for query: {query}. Please ensure the response contains exactly one value (e.g., by using :merge(0):avg for the metric)"
    )]
    AmbiguousResult {
        metric_id: String,
        count: usize,
        query: String,
    },

    /// The API answered but carried no usable data.
    #[error("No data: {0}")]
    NoData(String),

    /// Response body could not be decoded.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The client could not be constructed from the given settings.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// A stored SLI query string could not be decoded.
    #[error("Invalid SLI query '{query}': {message}")]
    InvalidSliQuery { query: String, message: String },

    /// No custom query and no default exists for an indicator.
    #[error("Unsupported SLI metric {0}")]
    UnsupportedSli(String),

    /// The SLO endpoint answered with an evaluation error.
    #[error("Dynatrace API returned an error for SLO {slo_id}: {error}")]
    SloEvaluation { slo_id: String, error: String },
}

/// `error <code>` when the error envelope was parsed, `status code <status>` otherwise.
fn api_error_label(status: &u16, code: &Option<i64>) -> String {
    match code {
        Some(code) => format!("error {}", code),
        None => format!("status code {}", status),
    }
}

impl ClientError {
    /// HTTP status of an API error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::MetricLookup { source, .. } => source.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_with_envelope_code() {
        let err = ClientError::Api {
            status: 400,
            code: Some(400),
            message: "Constraints violated.".to_string(),
            url: "https://tenant/api/v2/metrics/query".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Dynatrace API returned error 400 at https://tenant/api/v2/metrics/query: Constraints violated."
        );
    }

    #[test]
    fn test_api_error_without_envelope() {
        let err = ClientError::Api {
            status: 502,
            code: None,
            message: "Bad Gateway".to_string(),
            url: "https://tenant/api/v2/slo/x".to_string(),
        };
        assert!(err.to_string().starts_with("Dynatrace API returned status code 502 at"));
    }

    #[test]
    fn test_status_through_metric_lookup() {
        let err = ClientError::MetricLookup {
            metric: "builtin:service.response.time".to_string(),
            source: Box::new(ClientError::Api {
                status: 404,
                code: Some(404),
                message: "not found".to_string(),
                url: "u".to_string(),
            }),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().starts_with("Failed to describe metric builtin:service.response.time"));
        assert_eq!(ClientError::NoData("x".to_string()).status(), None);
    }
}
