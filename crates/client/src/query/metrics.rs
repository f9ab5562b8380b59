//! Metrics API v2 query construction.
//!
//! Responsibilities:
//! - Turn a stored or generated query fragment into the final `/api/v2/metrics/query` request.
//! - Accept both query syntaxes: `metricSelector=...&entitySelector=...` and the legacy
//!   `selector?scope=...` form.
//! - Report the metric id the response is expected to carry.
//!
//! Does NOT handle:
//! - Executing the query (see `endpoints::metrics`).
//!
//! Invariants:
//! - `resolution=Inf`, `from` and `to` are always present; parameters are emitted sorted.
//! - A legacy `scope` parameter is renamed to `entitySelector` and scoped to services.

use crate::error::{ClientError, Result};
use crate::query::params::QueryParams;
use crate::query::placeholders::PlaceholderResolver;
use crate::query::window::TimeWindow;

/// Path of the metrics query endpoint.
pub const METRICS_QUERY_PATH: &str = "/api/v2/metrics/query";

const LEGACY_PREFIX: &str = "?metricSelector=";
const SERVICE_TYPE: &str = "type(SERVICE)";

/// A fully built metrics query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsQuery {
    /// Encoded query string, without the leading `?`.
    pub query_string: String,
    /// Metric id the results are matched against.
    pub metric_id: String,
}

impl MetricsQuery {
    /// Absolute request URL for `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}?{}", base_url, METRICS_QUERY_PATH, self.query_string)
    }
}

/// Build the final metrics query for `fragment` over `window`.
pub fn build_metrics_query(
    placeholders: &PlaceholderResolver,
    fragment: &str,
    window: &TimeWindow,
) -> Result<MetricsQuery> {
    let mut query = placeholders.apply(fragment);

    if query.starts_with(LEGACY_PREFIX) {
        tracing::debug!(query = %query, "Query starts with '?metricSelector='; dropping the '?'");
        query.remove(0);
    }

    let (legacy_metric_id, raw_params) = match query.split_once('?') {
        Some((selector, rest)) => {
            tracing::debug!(query = %query, "Query uses the legacy 'selector?params' format");
            (
                Some(selector.to_string()),
                format!("metricSelector={}&{}", selector, rest),
            )
        }
        None => (None, query),
    };

    let mut params = QueryParams::parse(&raw_params)?;
    params.add("resolution", "Inf");
    params.add("from", window.start_millis());
    params.add("to", window.end_millis());

    let scopes = params.remove("scope");
    if let Some(scope) = scopes.into_iter().find(|s| !s.is_empty()) {
        tracing::debug!(scope = %scope, "Converting legacy 'scope' to 'entitySelector'");
        let selector = if scope.contains(SERVICE_TYPE) {
            scope
        } else {
            format!("{},{}", scope, SERVICE_TYPE)
        };
        params.add("entitySelector", selector);
    }

    let metric_id = match legacy_metric_id {
        Some(id) => id,
        None => params
            .get("metricSelector")
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ClientError::QueryBuild(format!("no metricSelector in '{}'", fragment))
            })?,
    };

    let query_string = params.encode();
    tracing::debug!(query = %query_string, metric = %metric_id, "Built metrics query");

    Ok(MetricsQuery {
        query_string,
        metric_id,
    })
}

/// Whether a result's metric id belongs to the queried metric.
///
/// Filter expressions make the backend rewrite dimension names (`dt.entity.browser`
/// becomes `dt~entity~browser`), so ids containing `~` are compared on the part before
/// the first `:` only.
pub fn is_matching_metric_id(result_metric_id: &str, query_metric_id: &str) -> bool {
    if result_metric_id == query_metric_id {
        return true;
    }
    if result_metric_id.contains('~') && result_metric_id.contains(':') {
        let result_prefix = result_metric_id.split(':').next().unwrap_or_default();
        let query_prefix = query_metric_id.split(':').next().unwrap_or_default();
        return result_prefix == query_prefix;
    }
    false
}
