//! Metric query generation for chart and data explorer tiles, plus the selectors of
//! problem tiles.
//!
//! Responsibilities:
//! - Merge the metric dimensions a tile does not show, right to left by index.
//! - Translate tile filters and splits into `:filter(...)` and entity selector fragments.
//! - Produce the per-row templates that let every expanded indicator replay its own row.
//!
//! Does NOT handle:
//! - Fetching metric definitions or executing queries (see `sli::dashboard`).
//!
//! Invariants:
//! - Generated queries always contain `:names`, which is where per-row filters are spliced in.
//! - Templates contain [`FILTER_DIMENSION_VALUE`] exactly once, or are empty.

use crate::models::{
    ChartSeries, Dashboard, DataExplorerQuery, FiltersPerEntityType, MetricDefinition, Tile,
};

/// Placeholder replaced by a dimension value (or entity id) when a row is expanded.
pub const FILTER_DIMENSION_VALUE: &str = "FILTERDIMENSIONVALUE";

const ENTITY_DIMENSION_PREFIX: &str = "dt.entity.";
const SPECIFIC_ENTITIES: &str = "SPECIFIC_ENTITIES";
const AUTO_TAGS: &str = "AUTO_TAGS";

/// A metrics query derived from one data explorer query or chart series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileQuery {
    /// Metric the tile shows.
    pub metric: String,
    /// Unit from the metric definition.
    pub unit: String,
    /// Query fragment, before time window and placeholders are applied.
    pub metric_query: String,
    /// Appended once per expanded row, e.g. `,entityId(FILTERDIMENSIONVALUE)`.
    pub entity_selector_template: String,
    /// Spliced after `:names` per expanded row, e.g. `:filter(eq(Test Step,FILTERDIMENSIONVALUE))`.
    pub filter_template: String,
    /// Number of dimensions the tile splits by.
    pub split_count: usize,
}

/// `,mzId(<id>)` for the tile's zone, else the dashboard's, else empty.
pub fn management_zone_filter(dashboard: &Dashboard, tile: &Tile) -> String {
    tile.management_zone
        .as_ref()
        .or_else(|| dashboard.management_zone())
        .map(|mz| format!(",mzId({})", mz.id()))
        .unwrap_or_default()
}

/// `<base>[,managementZoneIds(dash)][,managementZoneIds(tile)]`.
pub fn problem_selector(base: &str, dashboard: &Dashboard, tile: &Tile) -> String {
    let mut selector = base.to_string();
    for mz in [dashboard.management_zone(), tile.management_zone.as_ref()]
        .into_iter()
        .flatten()
    {
        selector.push_str(&format!(",managementZoneIds({})", mz.id()));
    }
    selector
}

/// Entity selector fragment for a chart's per-entity-type filters.
///
/// Always starts with `,` when non-empty: `,entityId("SERVICE-1"),tag("env")`.
pub fn entity_selector_from_filters(filters: &FiltersPerEntityType, entity_type: &str) -> String {
    let Some(by_kind) = filters.get(entity_type) else {
        return String::new();
    };

    let mut selector = String::new();
    for entity_id in by_kind.get(SPECIFIC_ENTITIES).into_iter().flatten() {
        selector.push_str(&format!(",entityId(\"{}\")", entity_id));
    }
    for tag in by_kind.get(AUTO_TAGS).into_iter().flatten() {
        selector.push_str(&format!(",tag(\"{}\")", tag));
    }
    selector
}

/// Build the metrics query of one data explorer query.
///
/// Only the first nested filter and a single split dimension are honored.
pub fn data_explorer_query(
    definition: &MetricDefinition,
    query: &DataExplorerQuery,
    mz_filter: &str,
) -> TileQuery {
    let mut merges = String::new();
    for (index, dimension) in definition.dimension_definitions.iter().enumerate().rev() {
        if !query.split_by.contains(&dimension.key) {
            tracing::debug!(dimension = %dimension.key, "Merging dimension");
            merges.push_str(&format!(":merge({})", index));
        }
    }

    let mut filter = String::new();
    let mut filter_template = String::new();
    let mut entity_selector_template = String::new();
    let mut entity_filter = String::new();

    if let Some(nested) = query
        .filter_by
        .as_ref()
        .and_then(|f| f.nested_filters.first())
    {
        match nested.criteria.as_slice() {
            [criterion] if nested.filter.starts_with(ENTITY_DIMENSION_PREFIX) => {
                entity_selector_template = format!(",entityId({})", FILTER_DIMENSION_VALUE);
                entity_filter = format!("&entitySelector=entityId({})", criterion.value);
            }
            [criterion] => {
                filter_template = format!(
                    ":filter(eq({},{}))",
                    nested.filter, FILTER_DIMENSION_VALUE
                );
                filter = format!(
                    ":filter({}({},{}))",
                    criterion.evaluator, nested.filter, criterion.value
                );
            }
            _ => tracing::debug!(
                filter = %nested.filter,
                "Only a single filter criterion is supported for data explorer tiles"
            ),
        }
    }

    match query.split_by.as_slice() {
        [] => {}
        [split] => {
            filter_template.push_str(&format!(
                ":filter(eq({},{}))",
                split, FILTER_DIMENSION_VALUE
            ));
        }
        _ => tracing::debug!(
            metric = %query.metric,
            "Only a single split dimension is supported for data explorer tiles"
        ),
    }

    // The zone filter extends an entity selector; start one when the tile has none.
    let mz = match (entity_filter.is_empty(), mz_filter.strip_prefix(',')) {
        (true, Some(zone)) => format!("&entitySelector={}", zone),
        _ => mz_filter.to_string(),
    };

    let metric_query = format!(
        "metricSelector={}{}{}:{}:names{}{}",
        query.metric,
        merges,
        filter,
        definition.default_aggregation.aggregation_type.to_lowercase(),
        entity_filter,
        mz
    );

    TileQuery {
        metric: query.metric.clone(),
        unit: definition.unit.clone(),
        metric_query,
        entity_selector_template,
        filter_template,
        split_count: query.split_by.len(),
    }
}

/// Aggregation to query for a chart series.
fn chart_aggregation(definition: &MetricDefinition, series: &ChartSeries) -> String {
    let aggregation = if series.aggregation != "NONE" && !series.aggregation.is_empty() {
        series.aggregation.as_str()
    } else {
        definition.default_aggregation.aggregation_type.as_str()
    };

    match aggregation {
        "PERCENTILE" => format!("percentile({})", series.percentile.unwrap_or_default()),
        "OF_INTEREST_RATIO" | "OTHER_RATIO" => "avg".to_string(),
        other => other.to_lowercase(),
    }
}

/// Build the metrics query of one custom chart series.
pub fn chart_query(
    definition: &MetricDefinition,
    series: &ChartSeries,
    mz_filter: &str,
    filters: &FiltersPerEntityType,
) -> TileQuery {
    let mut merges = String::new();
    let mut filter = String::new();
    let mut filter_template = String::new();
    let mut entity_selector_template = String::new();

    for index in (0..definition.dimension_definitions.len()).rev() {
        let index_id = index.to_string();
        let shown: Vec<_> = series
            .dimensions
            .iter()
            .filter(|d| d.id == index_id)
            .collect();

        if shown.is_empty() {
            merges.push_str(&format!(":merge({})", index));
            continue;
        }

        for dimension in shown {
            if let Some(value) = dimension.values.first() {
                filter = format!(":filter(eq({},{}))", dimension.name, value);
            } else if dimension.name.starts_with(ENTITY_DIMENSION_PREFIX) {
                entity_selector_template = format!(",entityId({})", FILTER_DIMENSION_VALUE);
            } else {
                filter_template = format!(
                    ":filter(eq({},{}))",
                    dimension.name, FILTER_DIMENSION_VALUE
                );
            }
        }
    }

    let entity_type = definition
        .entity_type
        .first()
        .cloned()
        .unwrap_or_else(|| series.entity_type.clone());

    let metric_query = format!(
        "metricSelector={}{}{}:{}:names&entitySelector=type({}){}{}",
        series.metric,
        merges,
        filter,
        chart_aggregation(definition, series),
        entity_type,
        entity_selector_from_filters(filters, &entity_type),
        mz_filter
    );

    TileQuery {
        metric: series.metric.clone(),
        unit: definition.unit.clone(),
        metric_query,
        entity_selector_template,
        filter_template,
        split_count: series.dimensions.len(),
    }
}
