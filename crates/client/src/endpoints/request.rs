//! Request execution and response normalization.
//!
//! Responsibilities:
//! - Send a prepared request once and record request metrics.
//! - Turn non-success responses into `ClientError::Api`, using the Dynatrace error
//!   envelope when the body carries one.
//! - Decode JSON bodies, reporting decode failures as `InvalidResponse`.
//!
//! Does NOT handle:
//! - Retries. A failed call is reported to the caller as is.
//!
//! Invariants:
//! - Every call records one request, one duration sample and at most one error.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::ApiErrorEnvelope;

/// Sends an HTTP request and normalizes failures.
///
/// # Arguments
///
/// * `builder` - The `reqwest::RequestBuilder` to execute
/// * `endpoint` - Templated endpoint path used as the metrics label
/// * `method` - HTTP method label
/// * `metrics` - Optional collector for request metrics
///
/// # Errors
///
/// Returns `ClientError::Unreachable` on transport failures and `ClientError::Api`
/// for any non-success status.
pub async fn send_request(
    builder: RequestBuilder,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    if let Some(m) = metrics {
        m.record_request(endpoint, method);
    }
    let started = Instant::now();

    let response = match builder.send().await {
        Ok(response) => response,
        Err(e) => {
            let err = ClientError::from(e);
            if let Some(m) = metrics {
                m.record_request_duration(endpoint, method, started.elapsed(), None);
                m.record_client_error(endpoint, method, &err);
            }
            return Err(err);
        }
    };

    let status = response.status().as_u16();
    if let Some(m) = metrics {
        m.record_request_duration(endpoint, method, started.elapsed(), Some(status));
    }

    if response.status().is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    let err = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => ClientError::Api {
            status,
            code: Some(envelope.error.code),
            message: envelope.error.message,
            url,
        },
        Err(_) => ClientError::Api {
            status,
            code: None,
            message: body,
            url,
        },
    };
    debug!(endpoint, status, error = %err, "Dynatrace API request failed");

    if let Some(m) = metrics {
        m.record_client_error(endpoint, method, &err);
    }
    Err(err)
}

/// Read the body and decode it as JSON.
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
