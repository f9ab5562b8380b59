//! Metrics API methods for [`DynatraceClient`].

use crate::client::DynatraceClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{MetricDefinition, MetricsQueryResult};
use crate::query::MetricsQuery;

impl DynatraceClient {
    /// Fetch the definition of a metric.
    pub async fn describe_metric(&self, metric_id: &str) -> Result<MetricDefinition> {
        endpoints::describe_metric(
            &self.http,
            &self.base_url,
            self.token(),
            metric_id,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Execute a metrics query; an empty result is `ClientError::NoData`.
    pub async fn query_metrics(&self, query: &MetricsQuery) -> Result<MetricsQueryResult> {
        endpoints::query_metrics(
            &self.http,
            &self.base_url,
            self.token(),
            query,
            self.metrics.as_ref(),
        )
        .await
    }
}
