//! Metrics API v2 models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::serde_helpers::null_as_default;

/// Default aggregation of a metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAggregation {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub aggregation_type: String,
}

/// One dimension of a metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub dimension_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
}

/// Response of `GET /api/v2/metrics/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aggregation_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transformations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub default_aggregation: DefaultAggregation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimension_definitions: Vec<DimensionDefinition>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type: Vec<String>,
}

/// One data series of a metrics query result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimension_map: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamps: Vec<i64>,
    /// Data points; the backend reports gaps as `null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<Option<f64>>,
}

impl MetricSeries {
    /// Arithmetic mean of the non-null values, `None` when there are none.
    pub fn mean(&self) -> Option<f64> {
        let (sum, count) = self
            .values
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    /// First non-null value.
    pub fn first_value(&self) -> Option<f64> {
        self.values.iter().flatten().next().copied()
    }
}

/// All series returned for one metric selector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeriesCollection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<MetricSeries>,
}

/// Response of `GET /api/v2/metrics/query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsQueryResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u64,
    #[serde(default)]
    pub next_page_key: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: Vec<MetricSeriesCollection>,
}
