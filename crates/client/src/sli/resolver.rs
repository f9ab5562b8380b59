//! Ad-hoc resolution of a single indicator value.
//!
//! Responsibilities:
//! - Look up the stored query of an indicator: custom override first, then the defaults.
//! - Replay the query against the matching API and return one scaled value.
//!
//! Invariants:
//! - Metrics queries must match exactly one data series; anything else is ambiguous.
//! - Errors propagate to the caller; nothing is retried.

use std::collections::BTreeMap;

use crate::client::DynatraceClient;
use crate::error::{ClientError, Result};
use crate::query::{
    PlaceholderResolver, SliQuery, TimeWindow, build_metrics_query, build_usql_query,
    is_matching_metric_id,
};
use crate::sli::defaults::default_query;
use crate::sli::scaling::scale_value;

/// Resolves indicator values by replaying stored queries.
pub struct SliResolver<'a> {
    client: &'a DynatraceClient,
    placeholders: &'a PlaceholderResolver,
    custom_queries: &'a BTreeMap<String, String>,
}

impl<'a> SliResolver<'a> {
    pub fn new(
        client: &'a DynatraceClient,
        placeholders: &'a PlaceholderResolver,
        custom_queries: &'a BTreeMap<String, String>,
    ) -> Self {
        Self {
            client,
            placeholders,
            custom_queries,
        }
    }

    /// Stored query of `name`: a custom query, else a built-in default.
    pub fn query_for(&self, name: &str) -> Result<SliQuery> {
        if let Some(raw) = self.custom_queries.get(name) {
            return raw.parse();
        }
        tracing::debug!(indicator = %name, "No custom query; looking in defaults");
        default_query(name)
            .map(|query| SliQuery::Metrics { query })
            .ok_or_else(|| ClientError::UnsupportedSli(name.to_string()))
    }

    /// Value of indicator `name` over `window`.
    ///
    /// # Errors
    ///
    /// - `UnsupportedSli` when neither a custom query nor a default exists.
    /// - `AmbiguousResult` when a metrics query returns more than one series.
    /// - `NoData` when no value for the indicator could be found.
    pub async fn get_sli_value(&self, name: &str, window: &TimeWindow) -> Result<f64> {
        let query = self.query_for(name)?;
        tracing::debug!(indicator = %name, kind = query.kind(), "Resolving indicator");

        let value = match &query {
            SliQuery::Usql {
                visualization,
                dimension,
                query,
            } => {
                let encoded = build_usql_query(self.placeholders, query, window);
                let result = self.client.query_usql(&encoded).await?;
                let mut found = None;
                for row in &result.values {
                    if let Some((row_dimension, value)) = visualization.extract(row)? {
                        if row_dimension == *dimension {
                            found = Some(value);
                        }
                    }
                }
                found
            }
            SliQuery::Slo { id } => Some(self.client.get_slo(id, window).await?.evaluated_percentage),
            SliQuery::Problems { query } => {
                let query = self.placeholders.apply(query);
                Some(self.client.query_problems(&query, window).await?.total_count as f64)
            }
            SliQuery::SecurityProblems { query } => {
                let query = self.placeholders.apply(query);
                Some(
                    self.client
                        .query_security_problems(&query, window)
                        .await?
                        .total_count as f64,
                )
            }
            SliQuery::MetricsV2 { unit, query } => self.metric_value(unit, query, window).await?,
            SliQuery::Metrics { query } => self.metric_value("", query, window).await?,
        };

        value.ok_or_else(|| {
            ClientError::NoData(format!(
                "Not able to query identifier {} from Dynatrace",
                name
            ))
        })
    }

    async fn metric_value(
        &self,
        unit: &str,
        fragment: &str,
        window: &TimeWindow,
    ) -> Result<Option<f64>> {
        let built = build_metrics_query(self.placeholders, fragment, window)?;
        let result = self.client.query_metrics(&built).await?;

        let Some(collection) = result
            .result
            .iter()
            .find(|c| is_matching_metric_id(&c.metric_id, &built.metric_id))
        else {
            return Ok(None);
        };

        let [series] = collection.data.as_slice() else {
            return Err(ClientError::AmbiguousResult {
                metric_id: built.metric_id.clone(),
                count: collection.data.len(),
                query: built.query_string.clone(),
            });
        };

        Ok(series
            .first_value()
            .map(|value| scale_value(&built.metric_id, unit, value)))
    }
}
