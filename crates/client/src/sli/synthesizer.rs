//! Accumulation of SLI results, indicator queries and objectives.
//!
//! Responsibilities:
//! - Expand a metrics result into one indicator per data row.
//! - Record the replayable query for every indicator and the tile's objective.
//!
//! Does NOT handle:
//! - Executing queries; callers hand in the outcome.
//!
//! Invariants:
//! - Every pushed indicator gets exactly one query in `indicators`.
//! - Values are unit-scaled exactly once, here.
//! - Results keep backend row order.
//! - Dimension values spliced into a stored query are escaped so the query parser
//!   hands them back unchanged.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::Result;
use crate::models::{
    MetricsQueryResult, Objective, ServiceLevelObjectives, SliDocument, SliResult,
    UsqlVisualization,
};
use crate::query::{SliQuery, is_matching_metric_id};
use crate::sli::naming::clean_indicator_name;
use crate::sli::scaling::scale_value;
use crate::sli::tiles::{FILTER_DIMENSION_VALUE, TileQuery};
use crate::sli::title::TileDirectives;

const NAMES_TRANSFORMATION: &str = ":names";

/// Characters the query-string parser would otherwise split on or decode.
const ROW_VALUE_ENCODE_SET: &AsciiSet = &CONTROLS.add(b'%').add(b'&').add(b'+').add(b'=').add(b'#');

fn encode_row_value(value: &str) -> String {
    utf8_percent_encode(value, ROW_VALUE_ENCODE_SET).to_string()
}

/// The SLI results, indicator queries and SLO document built by one dashboard pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliSet {
    pub results: Vec<SliResult>,
    pub indicators: SliDocument,
    pub objectives: ServiceLevelObjectives,
}

impl SliSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one indicator.
    pub fn push(&mut self, result: SliResult, query: &SliQuery, objective: Option<Objective>) {
        self.indicators
            .indicators
            .insert(result.metric.clone(), query.to_string());
        if let Some(objective) = objective {
            self.objectives.objectives.push(objective);
        }
        self.results.push(result);
    }

    /// Record a failed indicator; it keeps its query but gets no objective.
    pub fn push_failure(&mut self, indicator: &str, query: &SliQuery, message: impl Into<String>) {
        self.push(SliResult::failure(indicator, message), query, None);
    }

    /// Record one row of a USQL tile.
    ///
    /// Stored USQL queries are `;`-separated, so a dimension containing `;` could not be
    /// replayed; such rows become failed indicators.
    pub fn add_usql_row(
        &mut self,
        directives: &TileDirectives,
        visualization: &UsqlVisualization,
        usql: &str,
        dimension: String,
        value: f64,
    ) {
        let indicator = if dimension.is_empty() {
            directives.sli.clone()
        } else {
            format!("{}_{}", directives.sli, dimension)
        };
        let indicator = clean_indicator_name(&indicator);

        if dimension.contains(';') {
            tracing::warn!(indicator = %indicator, dimension = %dimension, "USQL dimension contains ';'");
            let query = SliQuery::Usql {
                visualization: visualization.clone(),
                dimension: String::new(),
                query: usql.to_string(),
            };
            self.push_failure(
                &indicator,
                &query,
                format!("USQL dimension '{}' must not contain ';'", dimension),
            );
            return;
        }

        let query = SliQuery::Usql {
            visualization: visualization.clone(),
            dimension,
            query: usql.to_string(),
        };
        let objective = directives.objective(&indicator);
        self.push(SliResult::success(indicator, value), &query, Some(objective));
    }

    /// Expand a metrics query outcome into indicators.
    ///
    /// `metric_id` is the id the built query expects results for. A failed query
    /// yields one failed result under the base name with the bare query stored.
    pub fn add_metrics_outcome(
        &mut self,
        tile: &TileQuery,
        directives: &TileDirectives,
        metric_id: &str,
        outcome: Result<MetricsQueryResult>,
    ) {
        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(indicator = %directives.sli, error = %err, "Metrics query failed");
                self.push_failure(
                    &directives.sli,
                    &SliQuery::Metrics {
                        query: tile.metric_query.clone(),
                    },
                    err.to_string(),
                );
                return;
            }
        };

        for collection in &result.result {
            if !is_matching_metric_id(&collection.metric_id, metric_id) {
                tracing::debug!(
                    wanted = %metric_id,
                    got = %collection.metric_id,
                    "Skipping result for another metric"
                );
                continue;
            }
            if collection.data.is_empty() {
                tracing::debug!(metric = %metric_id, "No data for metric");
            }

            let expand = collection.data.len() > 1;
            for series in &collection.data {
                let mut indicator = directives.sli.clone();
                let mut row_query = tile.metric_query.clone();
                let mut row_filter = NAMES_TRANSFORMATION.to_string();

                if expand {
                    // `:names` yields (name, id) pairs for entity dimensions.
                    let stride = if series.dimensions.len() == tile.split_count * 2 {
                        2
                    } else {
                        1
                    };
                    for index in (0..series.dimensions.len()).step_by(stride) {
                        let value = &series.dimensions[index];
                        indicator.push('_');
                        indicator.push_str(value);
                        row_filter = format!(
                            "{}{}",
                            NAMES_TRANSFORMATION,
                            tile.filter_template.replacen(
                                FILTER_DIMENSION_VALUE,
                                &encode_row_value(value),
                                1
                            )
                        );
                        if stride == 2 && !tile.entity_selector_template.is_empty() {
                            if let Some(entity_id) = series.dimensions.get(index + 1) {
                                row_query.push_str(&tile.entity_selector_template.replacen(
                                    FILTER_DIMENSION_VALUE,
                                    &encode_row_value(entity_id),
                                    1,
                                ));
                            }
                        }
                    }
                }

                let indicator = clean_indicator_name(&indicator);
                let query = SliQuery::MetricsV2 {
                    unit: tile.unit.clone(),
                    query: row_query.replacen(NAMES_TRANSFORMATION, &row_filter, 1),
                };

                let Some(mean) = series.mean() else {
                    tracing::debug!(indicator = %indicator, "Row has no values");
                    self.push_failure(
                        &indicator,
                        &query,
                        format!("Dynatrace Metrics API returned no values for {}", indicator),
                    );
                    continue;
                };
                let value = scale_value(metric_id, &tile.unit, mean);
                tracing::debug!(indicator = %indicator, value, "Got indicator value");

                let objective = directives.objective(&indicator);
                self.push(SliResult::success(indicator, value), &query, Some(objective));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::models::{MetricSeries, MetricSeriesCollection};

    fn tile_query(split_count: usize, entity: bool) -> TileQuery {
        TileQuery {
            metric: "calc:service.teststep_rt".to_string(),
            unit: "MicroSecond".to_string(),
            metric_query: "metricSelector=calc:service.teststep_rt:merge(0):avg:names".to_string(),
            entity_selector_template: if entity {
                ",entityId(FILTERDIMENSIONVALUE)".to_string()
            } else {
                String::new()
            },
            filter_template: ":filter(eq(Test Step,FILTERDIMENSIONVALUE))".to_string(),
            split_count,
        }
    }

    fn series(dimensions: &[&str], values: &[f64]) -> MetricSeries {
        MetricSeries {
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            values: values.iter().copied().map(Some).collect(),
            ..MetricSeries::default()
        }
    }

    fn outcome(data: Vec<MetricSeries>) -> Result<MetricsQueryResult> {
        Ok(MetricsQueryResult {
            total_count: 1,
            next_page_key: None,
            result: vec![MetricSeriesCollection {
                metric_id: "calc:service.teststep_rt:merge(0):avg:names".to_string(),
                data,
            }],
        })
    }

    const METRIC_ID: &str = "calc:service.teststep_rt:merge(0):avg:names";

    #[test]
    fn test_three_rows_expand_into_three_indicators() {
        let directives = TileDirectives::parse("sli=teststep_rt;pass=<500").unwrap();
        let mut set = SliSet::new();
        set.add_metrics_outcome(
            &tile_query(1, false),
            &directives,
            METRIC_ID,
            outcome(vec![
                series(&["Login"], &[100_000.0, 300_000.0]),
                series(&["Add to cart"], &[50_000.0]),
                series(&["Checkout page"], &[1_000.0]),
            ]),
        );

        let names: Vec<_> = set.results.iter().map(|r| r.metric.as_str()).collect();
        assert_eq!(
            names,
            vec!["teststep_rt_Login", "teststep_rt_Add_to_cart", "teststep_rt_Checkout_page"]
        );
        assert_eq!(set.results[0].value, 200.0);
        assert_eq!(set.results[1].value, 50.0);
        assert_eq!(
            set.indicators.indicators["teststep_rt_Add_to_cart"],
            "MV2;MicroSecond;metricSelector=calc:service.teststep_rt:merge(0):avg:names:filter(eq(Test Step,Add to cart))"
        );
        assert_eq!(set.objectives.objectives.len(), 3);
        assert_eq!(set.objectives.objectives[2].sli, "teststep_rt_Checkout_page");
    }

    #[test]
    fn test_single_row_keeps_base_name() {
        let directives = TileDirectives::parse("sli=rt").unwrap();
        let mut set = SliSet::new();
        set.add_metrics_outcome(
            &tile_query(1, false),
            &directives,
            METRIC_ID,
            outcome(vec![series(&["Login"], &[2_000.0])]),
        );
        assert_eq!(set.results.len(), 1);
        assert_eq!(set.results[0].metric, "rt");
        assert_eq!(set.results[0].value, 2.0);
        assert_eq!(
            set.indicators.indicators["rt"],
            "MV2;MicroSecond;metricSelector=calc:service.teststep_rt:merge(0):avg:names"
        );
    }

    #[test]
    fn test_entity_rows_use_name_and_id() {
        let directives = TileDirectives::parse("sli=svc_rt").unwrap();
        let mut set = SliSet::new();
        set.add_metrics_outcome(
            &tile_query(1, true),
            &directives,
            METRIC_ID,
            outcome(vec![
                series(&["carts", "SERVICE-1"], &[1000.0]),
                series(&["orders", "SERVICE-2"], &[3000.0]),
            ]),
        );
        assert_eq!(set.results[0].metric, "svc_rt_carts");
        assert_eq!(
            set.indicators.indicators["svc_rt_orders"],
            "MV2;MicroSecond;metricSelector=calc:service.teststep_rt:merge(0):avg:names:filter(eq(Test Step,orders)),entityId(SERVICE-2)"
        );
    }

    #[test]
    fn test_failed_query_records_bare_query() {
        let directives = TileDirectives::parse("sli=rt;pass=<1").unwrap();
        let mut set = SliSet::new();
        set.add_metrics_outcome(
            &tile_query(0, false),
            &directives,
            METRIC_ID,
            Err(ClientError::NoData(
                "Dynatrace Metrics API returned no DataPoints".to_string(),
            )),
        );
        assert_eq!(set.results.len(), 1);
        assert!(!set.results[0].success);
        assert_eq!(set.results[0].value, 0.0);
        assert_eq!(
            set.indicators.indicators["rt"],
            "metricSelector=calc:service.teststep_rt:merge(0):avg:names"
        );
        assert!(set.objectives.objectives.is_empty());
    }

    #[test]
    fn test_unrelated_metric_ignored() {
        let directives = TileDirectives::parse("sli=rt").unwrap();
        let mut set = SliSet::new();
        let result = Ok(MetricsQueryResult {
            total_count: 1,
            next_page_key: None,
            result: vec![MetricSeriesCollection {
                metric_id: "builtin:other".to_string(),
                data: vec![series(&[], &[1.0])],
            }],
        });
        set.add_metrics_outcome(&tile_query(0, false), &directives, METRIC_ID, result);
        assert!(set.results.is_empty());
    }

    #[test]
    fn test_three_entity_rows_pair_names_with_ids() {
        let directives = TileDirectives::parse("sli=svc_rt;pass=<=300").unwrap();
        let mut set = SliSet::new();
        set.add_metrics_outcome(
            &tile_query(1, true),
            &directives,
            METRIC_ID,
            outcome(vec![
                series(&["carts", "SERVICE-1"], &[1000.0]),
                series(&["orders", "SERVICE-2"], &[2000.0]),
                series(&["payment", "SERVICE-3"], &[4000.0]),
            ]),
        );

        let names: Vec<_> = set.results.iter().map(|r| r.metric.as_str()).collect();
        assert_eq!(names, vec!["svc_rt_carts", "svc_rt_orders", "svc_rt_payment"]);
        let values: Vec<_> = set.results.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 4.0]);
        assert_eq!(
            set.indicators.indicators["svc_rt_payment"],
            "MV2;MicroSecond;metricSelector=calc:service.teststep_rt:merge(0):avg:names:filter(eq(Test Step,payment)),entityId(SERVICE-3)"
        );
        assert!(!set.indicators.indicators["svc_rt_carts"].contains("SERVICE-2"));
        assert_eq!(set.objectives.objectives.len(), 3);
    }

    #[test]
    fn test_row_values_survive_stored_query_parsing() {
        use crate::query::{PlaceholderResolver, TimeWindow, build_metrics_query};
        use chrono::{TimeZone, Utc};
        use dynatrace_config::DeliveryContext;

        let directives = TileDirectives::parse("sli=step").unwrap();
        let mut set = SliSet::new();
        set.add_metrics_outcome(
            &tile_query(1, false),
            &directives,
            METRIC_ID,
            outcome(vec![
                series(&["50% load"], &[1000.0]),
                series(&["Add & Remove"], &[1000.0]),
                series(&["C++ build"], &[1000.0]),
                series(&["a=b#c"], &[1000.0]),
            ]),
        );

        let placeholders =
            PlaceholderResolver::new(DeliveryContext::new("sockshop", "staging", "carts"), vec![]);
        let window = TimeWindow::new(
            Utc.timestamp_millis_opt(1_000).unwrap(),
            Utc.timestamp_millis_opt(2_000).unwrap(),
        );

        for value in ["50% load", "Add & Remove", "C++ build", "a=b#c"] {
            let indicator = clean_indicator_name(&format!("step_{}", value));
            let stored = &set.indicators.indicators[&indicator];
            let SliQuery::MetricsV2 { unit, query } = stored.parse::<SliQuery>().unwrap() else {
                panic!("Expected an MV2 query, got {}", stored);
            };
            assert_eq!(unit, "MicroSecond");

            let built = build_metrics_query(&placeholders, &query, &window).unwrap();
            assert_eq!(
                built.metric_id,
                format!(
                    "calc:service.teststep_rt:merge(0):avg:names:filter(eq(Test Step,{}))",
                    value
                )
            );
            assert!(!built.query_string.contains("&Remove"));
        }
    }

    #[test]
    fn test_entity_id_is_escaped() {
        let directives = TileDirectives::parse("sli=svc").unwrap();
        let mut set = SliSet::new();
        set.add_metrics_outcome(
            &tile_query(1, true),
            &directives,
            METRIC_ID,
            outcome(vec![
                series(&["carts", "SERVICE-1&x=1"], &[1000.0]),
                series(&["orders", "SERVICE-2"], &[1000.0]),
            ]),
        );
        assert!(
            set.indicators.indicators["svc_carts"].ends_with(",entityId(SERVICE-1%26x%3D1)")
        );
    }

    #[test]
    fn test_row_with_only_null_values_fails() {
        let directives = TileDirectives::parse("sli=step;pass=<500").unwrap();
        let mut set = SliSet::new();
        let mut empty = series(&["Checkout"], &[]);
        empty.values = vec![None, None];
        let mut gappy = series(&["Login"], &[]);
        gappy.values = vec![None, Some(4000.0), None, Some(2000.0)];
        set.add_metrics_outcome(
            &tile_query(1, false),
            &directives,
            METRIC_ID,
            outcome(vec![gappy, empty]),
        );

        assert_eq!(set.results.len(), 2);
        assert!(set.results[0].success);
        assert_eq!(set.results[0].value, 3.0);

        let failed = &set.results[1];
        assert_eq!(failed.metric, "step_Checkout");
        assert!(!failed.success);
        assert_eq!(failed.value, 0.0);
        assert!(failed.message.as_deref().unwrap().contains("no values"));
        assert!(set.indicators.indicators["step_Checkout"].starts_with("MV2;MicroSecond;"));
        assert_eq!(set.objectives.objectives.len(), 1);
    }

    #[test]
    fn test_usql_rows() {
        let directives = TileDirectives::parse("sli=ua;pass=>100").unwrap();
        let usql = "SELECT city, COUNT(*) FROM usersession GROUP BY city";
        let mut set = SliSet::new();
        set.add_usql_row(
            &directives,
            &UsqlVisualization::ColumnChart,
            usql,
            "Linz".to_string(),
            2501.0,
        );
        set.add_usql_row(
            &directives,
            &UsqlVisualization::ColumnChart,
            usql,
            "a;b".to_string(),
            12.0,
        );

        assert_eq!(set.results[0].metric, "ua_Linz");
        assert!(set.results[0].success);
        assert_eq!(
            set.indicators.indicators["ua_Linz"],
            format!("USQL;COLUMN_CHART;Linz;{}", usql)
        );

        let rejected = &set.results[1];
        assert!(!rejected.success);
        assert!(rejected.message.as_deref().unwrap().contains("must not contain ';'"));
        assert_eq!(set.objectives.objectives.len(), 1);
    }
}

