//! Dashboard models for the Dynatrace configuration API.
//!
//! Responsibilities:
//! - Decode the dashboard listing and single dashboards.
//! - Decode tiles permissively into one explicit variant per tile type.
//!
//! Does NOT handle:
//! - Interpreting tile titles or building queries (see `sli::tiles`).
//!
//! Invariants:
//! - Missing or `null` fields decode to their defaults; an unknown tile type decodes to
//!   `TileKind::Unsupported` instead of failing the dashboard.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::usql::UsqlVisualization;
use crate::serde_helpers::{null_as_default, opt_f64_from_number_or_string};

/// Response of `GET /api/config/v1/dashboards`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dashboards: Vec<DashboardStub>,
}

/// One entry of the dashboard listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStub {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: String,
}

/// A management zone reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementZone {
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_string_from_number_or_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

impl ManagementZone {
    /// Zone id, empty when absent.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub timeframe: String,
    #[serde(default)]
    pub management_zone: Option<ManagementZone>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shared: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner: String,
    #[serde(default)]
    pub dashboard_filter: Option<DashboardFilter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// A dashboard as returned by `GET /api/config/v1/dashboards/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub dashboard_metadata: DashboardMetadata,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tiles: Vec<Tile>,
}

impl Dashboard {
    /// Management zone of the dashboard-wide filter, if any.
    pub fn management_zone(&self) -> Option<&ManagementZone> {
        self.dashboard_metadata
            .dashboard_filter
            .as_ref()
            .and_then(|f| f.management_zone.as_ref())
    }
}

/// A single filter criterion of a data explorer query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterCriterion {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub evaluator: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedFilter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter_operator: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nested_filters: Vec<NestedFilter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub criteria: Vec<FilterCriterion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterBy {
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter_operator: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nested_filters: Vec<NestedFilter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub criteria: Vec<FilterCriterion>,
}

/// One query of a data explorer tile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExplorerQuery {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub space_aggregation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_aggregation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub split_by: Vec<String>,
    #[serde(default)]
    pub filter_by: Option<FilterBy>,
}

/// A dimension shown by a chart series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChartDimension {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<String>,
    #[serde(
        rename = "entityDimension",
        alias = "entitiyDimension",
        default,
        deserialize_with = "null_as_default"
    )]
    pub entity_dimension: bool,
}

/// One series of a custom chart.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aggregation: String,
    #[serde(default, deserialize_with = "opt_f64_from_number_or_string")]
    pub percentile: Option<f64>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub series_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: Vec<ChartDimension>,
}

/// Entity filters of a custom chart, keyed by entity type then filter kind.
pub type FiltersPerEntityType = BTreeMap<String, BTreeMap<String, Vec<String>>>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChartConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFilterConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    custom_name: String,
    #[serde(default)]
    chart_config: Option<RawChartConfig>,
    #[serde(default, deserialize_with = "null_as_default")]
    filters_per_entity_type: FiltersPerEntityType,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTileFilter {
    #[serde(default)]
    management_zone: Option<ManagementZone>,
}

/// The tile exactly as it appears in the dashboard JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTile {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    tile_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    query: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    visualization: String,
    #[serde(default, deserialize_with = "null_as_default")]
    custom_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    markdown: String,
    #[serde(default)]
    tile_filter: Option<RawTileFilter>,
    #[serde(default, deserialize_with = "null_as_default")]
    queries: Vec<DataExplorerQuery>,
    #[serde(default, deserialize_with = "null_as_default")]
    assigned_entities: Vec<String>,
    #[serde(default)]
    filter_config: Option<RawFilterConfig>,
}

/// Type-specific tile payload.
#[derive(Debug, Clone, PartialEq)]
pub enum TileKind {
    Header,
    SyntheticTests,
    Markdown {
        markdown: String,
    },
    Slo {
        assigned_entities: Vec<String>,
    },
    OpenProblems,
    OpenSecurityProblems,
    DataExplorer {
        queries: Vec<DataExplorerQuery>,
    },
    CustomCharting {
        series: Vec<ChartSeries>,
        filters_per_entity_type: FiltersPerEntityType,
    },
    /// `DTAQL` tile running a user session query.
    Usql {
        query: String,
        visualization: UsqlVisualization,
    },
    Unsupported(String),
}

/// A decoded dashboard tile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawTile")]
pub struct Tile {
    pub name: String,
    /// Title carrying the `sli=...` directives.
    pub title: String,
    /// Tile-level management zone override.
    pub management_zone: Option<ManagementZone>,
    pub kind: TileKind,
}

impl From<RawTile> for Tile {
    fn from(raw: RawTile) -> Self {
        let management_zone = raw.tile_filter.and_then(|f| f.management_zone);
        let filter_config = raw.filter_config.unwrap_or_default();

        let title = if raw.tile_type == "DATA_EXPLORER" {
            raw.name.clone()
        } else {
            [&filter_config.custom_name, &raw.custom_name, &raw.name]
                .into_iter()
                .find(|t| !t.is_empty())
                .cloned()
                .unwrap_or_default()
        };

        let kind = match raw.tile_type.as_str() {
            "HEADER" => TileKind::Header,
            "SYNTHETIC_TESTS" => TileKind::SyntheticTests,
            "MARKDOWN" => TileKind::Markdown {
                markdown: raw.markdown,
            },
            "SLO" => TileKind::Slo {
                assigned_entities: raw.assigned_entities,
            },
            "OPEN_PROBLEMS" => TileKind::OpenProblems,
            "OPEN_SECURITY_PROBLEMS" => TileKind::OpenSecurityProblems,
            "DATA_EXPLORER" => TileKind::DataExplorer {
                queries: raw.queries,
            },
            "CUSTOM_CHARTING" => TileKind::CustomCharting {
                series: filter_config
                    .chart_config
                    .map(|c| c.series)
                    .unwrap_or_default(),
                filters_per_entity_type: filter_config.filters_per_entity_type,
            },
            "DTAQL" => TileKind::Usql {
                query: raw.query,
                visualization: UsqlVisualization::from(raw.visualization.as_str()),
            },
            other => TileKind::Unsupported(other.to_string()),
        };

        Tile {
            name: raw.name,
            title,
            management_zone,
            kind,
        }
    }
}
