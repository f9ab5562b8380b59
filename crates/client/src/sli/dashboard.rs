//! Dashboard-driven SLI derivation.
//!
//! Responsibilities:
//! - Resolve which dashboard to use: an explicit id, a name search, or none.
//! - Skip re-parsing a dashboard that opted into change detection and did not change.
//! - Walk the tiles in order and turn every opted-in tile into indicators and objectives.
//!
//! Does NOT handle:
//! - Persisting the dashboard snapshot or generated documents (returned to the caller).
//! - Query string construction details (see `sli::tiles` and `query`).
//!
//! Invariants:
//! - Dashboard resolution and fetch failures abort the pass.
//! - A failing tile never aborts the pass; it contributes a failed `SliResult` instead.
//! - One HTTP call is in flight at a time and tile order is preserved.

use dynatrace_config::constants::{
    DASHBOARD_NAME_PREFIX, DEFAULT_OBJECTIVE_WEIGHT, PARSE_ON_CHANGE_MARKER,
};
use dynatrace_config::{DashboardReference, DeliveryContext};

use crate::client::DynatraceClient;
use crate::endpoints::decode_dashboard;
use crate::error::{ClientError, Result};
use crate::models::{
    ChartSeries, Dashboard, DataExplorerQuery, FiltersPerEntityType, ManagementZone,
    MetricDefinition, Objective, SliResult, SloCriteria, SloResult, Tile, TileKind,
    UsqlVisualization,
};
use crate::query::{
    PlaceholderResolver, SliQuery, TimeWindow, build_metrics_query, build_usql_query,
};
use crate::sli::markdown::{KQG_MARKER, apply_markdown};
use crate::sli::naming::clean_indicator_name;
use crate::sli::synthesizer::SliSet;
use crate::sli::tiles::{self, TileQuery};
use crate::sli::title::TileDirectives;

const PROBLEMS_INDICATOR: &str = "problems";
const SECURITY_PROBLEMS_INDICATOR: &str = "security_problems";
const OPEN_PROBLEMS_SELECTOR: &str = "status(open)";
const OPEN_SECURITY_PROBLEMS_SELECTOR: &str = "status(OPEN)";
const NO_PROBLEMS_CRITERIA: &str = "<=0";

/// Result of a dashboard pass.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardOutcome {
    /// No dashboard was requested or none matched the search.
    Skipped,
    /// The dashboard opted into change detection and equals the stored snapshot.
    Unchanged { link: String },
    /// The dashboard was parsed.
    Processed(Box<ProcessedDashboard>),
}

/// Everything a parsed dashboard produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDashboard {
    pub dashboard_id: String,
    /// Deep link to the dashboard for the evaluated window.
    pub link: String,
    pub sli: SliSet,
    /// The dashboard as fetched, for the caller to persist as the next snapshot.
    pub raw_dashboard: serde_json::Value,
}

/// Whether `id` is a version 4 UUID in `8-4-4-4-12` hex form.
pub fn is_valid_dashboard_id(id: &str) -> bool {
    let groups: Vec<&str> = id.split('-').collect();
    let lengths = [8, 4, 4, 4, 12];
    if groups.len() != lengths.len()
        || groups
            .iter()
            .zip(lengths)
            .any(|(g, len)| g.len() != len || !g.bytes().all(|b| b.is_ascii_hexdigit()))
    {
        return false;
    }
    groups[2].starts_with('4')
        && matches!(
            groups[3].as_bytes()[0],
            b'8' | b'9' | b'a' | b'b' | b'A' | b'B'
        )
}

/// Whether a dashboard name selects the delivery context.
///
/// The name must start with `KQG;` and carry `project=`, `service=` and `stage=`
/// segments equal to the context values, all compared case-insensitively.
pub fn dashboard_name_matches(name: &str, context: &DeliveryContext) -> bool {
    let name = name.to_lowercase();
    if !name.starts_with(DASHBOARD_NAME_PREFIX) {
        return false;
    }
    let segments: Vec<&str> = name.split(';').collect();
    [
        format!("project={}", context.project),
        format!("service={}", context.service),
        format!("stage={}", context.stage),
    ]
    .iter()
    .all(|wanted| segments.contains(&wanted.to_lowercase().as_str()))
}

/// `<base>#dashboard;id=<id>;gtf=c_<from>_<to>[;gf=<mz>]`.
pub fn dashboard_link(
    base_url: &str,
    dashboard_id: &str,
    window: &TimeWindow,
    management_zone: Option<&ManagementZone>,
) -> String {
    let zone = management_zone
        .map(|mz| format!(";gf={}", mz.id()))
        .unwrap_or_default();
    format!(
        "{}#dashboard;id={};gtf=c_{}_{}{}",
        base_url,
        dashboard_id,
        window.start_millis(),
        window.end_millis(),
        zone
    )
}

/// Whether a fetched dashboard must be parsed again.
///
/// Only dashboards carrying the ParseOnChange marker are compared with the stored
/// snapshot. Snapshots are compared as JSON, or as text when they are not JSON.
pub fn has_dashboard_changed(raw: &serde_json::Value, stored: Option<&str>) -> bool {
    if !raw.to_string().contains(PARSE_ON_CHANGE_MARKER) {
        return true;
    }
    let Some(stored) = stored.filter(|s| !s.trim().is_empty()) else {
        return true;
    };
    match serde_json::from_str::<serde_json::Value>(stored) {
        Ok(previous) => previous != *raw,
        Err(_) => serde_json::to_string_pretty(raw)
            .map(|current| current != stored)
            .unwrap_or(true),
    }
}

/// Runs dashboard passes against one tenant for one delivery context.
pub struct DashboardProcessor<'a> {
    client: &'a DynatraceClient,
    placeholders: &'a PlaceholderResolver,
}

impl<'a> DashboardProcessor<'a> {
    pub fn new(client: &'a DynatraceClient, placeholders: &'a PlaceholderResolver) -> Self {
        Self {
            client,
            placeholders,
        }
    }

    /// Run a full pass.
    ///
    /// `stored` is the dashboard snapshot persisted by a previous pass, if any. When
    /// no dashboard is configured but a snapshot exists, the dashboard is searched by
    /// name.
    ///
    /// # Errors
    ///
    /// Returns an error when the dashboard listing or fetch fails, or when the
    /// resolved id is not a valid UUID.
    pub async fn process(
        &self,
        reference: &DashboardReference,
        stored: Option<&str>,
        window: &TimeWindow,
    ) -> Result<DashboardOutcome> {
        let has_snapshot = stored.is_some_and(|s| !s.trim().is_empty());
        let dashboard_id = match reference {
            DashboardReference::NotSet if has_snapshot => {
                tracing::debug!("Stored dashboard present without setting; searching by name");
                self.find_dashboard().await?
            }
            DashboardReference::NotSet => None,
            DashboardReference::Query => self.find_dashboard().await?,
            DashboardReference::Id(id) => Some(id.clone()),
        };

        let Some(dashboard_id) = dashboard_id else {
            tracing::info!("No dashboard to process");
            return Ok(DashboardOutcome::Skipped);
        };

        if !is_valid_dashboard_id(&dashboard_id) {
            return Err(ClientError::InvalidDashboardId(dashboard_id));
        }

        let raw = self.client.get_dashboard_json(&dashboard_id).await?;
        let dashboard = decode_dashboard(raw.clone())?;
        let link = dashboard_link(
            self.client.base_url(),
            &dashboard_id,
            window,
            dashboard.management_zone(),
        );

        if !has_dashboard_changed(&raw, stored) {
            tracing::info!(dashboard = %dashboard_id, "Dashboard unchanged; skipping parse");
            return Ok(DashboardOutcome::Unchanged { link });
        }

        tracing::info!(dashboard = %dashboard_id, tiles = dashboard.tiles.len(), "Processing dashboard");
        let mut set = SliSet::new();
        for tile in &dashboard.tiles {
            self.process_tile(&dashboard, tile, window, &mut set).await;
        }

        Ok(DashboardOutcome::Processed(Box::new(ProcessedDashboard {
            dashboard_id,
            link,
            sli: set,
            raw_dashboard: raw,
        })))
    }

    /// Id of the first dashboard named after the delivery context.
    async fn find_dashboard(&self) -> Result<Option<String>> {
        let context = self.placeholders.context();
        let dashboards = self.client.list_dashboards().await?;
        let found = dashboards
            .into_iter()
            .find(|d| dashboard_name_matches(&d.name, context))
            .map(|d| d.id);

        match &found {
            Some(id) => tracing::debug!(
                project = %context.project,
                stage = %context.stage,
                service = %context.service,
                dashboard = %id,
                "Found quality gate dashboard"
            ),
            None => tracing::debug!(
                project = %context.project,
                stage = %context.stage,
                service = %context.service,
                "No quality gate dashboard found"
            ),
        }
        Ok(found)
    }

    async fn process_tile(
        &self,
        dashboard: &Dashboard,
        tile: &Tile,
        window: &TimeWindow,
        set: &mut SliSet,
    ) {
        let mz_filter = tiles::management_zone_filter(dashboard, tile);

        match &tile.kind {
            TileKind::Header | TileKind::SyntheticTests => {}
            TileKind::Markdown { markdown } => {
                if markdown.contains(KQG_MARKER) {
                    apply_markdown(markdown, &mut set.objectives);
                }
            }
            TileKind::Slo { assigned_entities } => {
                for slo_id in assigned_entities {
                    self.process_slo(slo_id, window, set).await;
                }
            }
            TileKind::OpenProblems => {
                let selector = tiles::problem_selector(OPEN_PROBLEMS_SELECTOR, dashboard, tile);
                self.process_problems(&selector, window, set).await;
            }
            TileKind::OpenSecurityProblems => {
                let selector =
                    tiles::problem_selector(OPEN_SECURITY_PROBLEMS_SELECTOR, dashboard, tile);
                self.process_security_problems(&selector, window, set).await;
            }
            TileKind::DataExplorer { queries } => {
                let Some(directives) = opted_in(tile) else {
                    return;
                };
                for query in queries {
                    self.process_data_explorer_query(query, &directives, &mz_filter, window, set)
                        .await;
                }
            }
            TileKind::CustomCharting {
                series,
                filters_per_entity_type,
            } => {
                let Some(directives) = opted_in(tile) else {
                    return;
                };
                for s in series {
                    self.process_chart_series(
                        s,
                        filters_per_entity_type,
                        &directives,
                        &mz_filter,
                        window,
                        set,
                    )
                    .await;
                }
            }
            TileKind::Usql {
                query,
                visualization,
            } => {
                let Some(directives) = opted_in(tile) else {
                    return;
                };
                self.process_usql(query, visualization, &directives, window, set)
                    .await;
            }
            TileKind::Unsupported(kind) => {
                tracing::debug!(tile_type = %kind, name = %tile.name, "Ignoring unsupported tile");
            }
        }
    }

    async fn process_slo(&self, slo_id: &str, window: &TimeWindow, set: &mut SliSet) {
        let query = SliQuery::Slo {
            id: slo_id.to_string(),
        };
        let slo = match self.client.get_slo(slo_id, window).await {
            Ok(slo) => slo,
            Err(err) => {
                tracing::warn!(slo = %slo_id, error = %err, "Failed to evaluate SLO");
                set.push_failure(&clean_indicator_name(slo_id), &query, err.to_string());
                return;
            }
        };

        let indicator = clean_indicator_name(&slo.name);
        let objective = slo_objective(&indicator, &slo);
        tracing::debug!(indicator = %indicator, value = slo.evaluated_percentage, "Adding SLO");
        set.push(
            SliResult::success(indicator, slo.evaluated_percentage),
            &query,
            Some(objective),
        );
    }

    async fn process_problems(&self, selector: &str, window: &TimeWindow, set: &mut SliSet) {
        let problem_query = format!("problemSelector={}", selector);
        let query = SliQuery::Problems {
            query: problem_query.clone(),
        };
        match self.client.query_problems(&problem_query, window).await {
            Ok(result) => set.push(
                SliResult::success(PROBLEMS_INDICATOR, result.total_count as f64),
                &query,
                Some(no_problems_objective(PROBLEMS_INDICATOR)),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to query open problems");
                set.push_failure(PROBLEMS_INDICATOR, &query, err.to_string());
            }
        }
    }

    async fn process_security_problems(
        &self,
        selector: &str,
        window: &TimeWindow,
        set: &mut SliSet,
    ) {
        let problem_query = format!("securityProblemSelector={}", selector);
        let query = SliQuery::SecurityProblems {
            query: problem_query.clone(),
        };
        match self
            .client
            .query_security_problems(&problem_query, window)
            .await
        {
            Ok(result) => set.push(
                SliResult::success(SECURITY_PROBLEMS_INDICATOR, result.total_count as f64),
                &query,
                Some(no_problems_objective(SECURITY_PROBLEMS_INDICATOR)),
            ),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to query open security problems");
                set.push_failure(SECURITY_PROBLEMS_INDICATOR, &query, err.to_string());
            }
        }
    }

    async fn process_data_explorer_query(
        &self,
        query: &DataExplorerQuery,
        directives: &TileDirectives,
        mz_filter: &str,
        window: &TimeWindow,
        set: &mut SliSet,
    ) {
        tracing::debug!(metric = %query.metric, "Processing data explorer query");
        let Some(definition) = self.describe(&query.metric, directives, set).await else {
            return;
        };
        let tile_query = tiles::data_explorer_query(&definition, query, mz_filter);
        self.run_tile_query(&tile_query, directives, window, set)
            .await;
    }

    async fn process_chart_series(
        &self,
        series: &ChartSeries,
        filters: &FiltersPerEntityType,
        directives: &TileDirectives,
        mz_filter: &str,
        window: &TimeWindow,
        set: &mut SliSet,
    ) {
        tracing::debug!(metric = %series.metric, "Processing chart series");
        let Some(definition) = self.describe(&series.metric, directives, set).await else {
            return;
        };
        let tile_query = tiles::chart_query(&definition, series, mz_filter, filters);
        self.run_tile_query(&tile_query, directives, window, set)
            .await;
    }

    /// Fetch a metric definition, recording a failed indicator when it is unavailable.
    async fn describe(
        &self,
        metric: &str,
        directives: &TileDirectives,
        set: &mut SliSet,
    ) -> Option<MetricDefinition> {
        match self.client.describe_metric(metric).await {
            Ok(definition) => Some(definition),
            Err(source) => {
                let err = ClientError::MetricLookup {
                    metric: metric.to_string(),
                    source: Box::new(source),
                };
                tracing::warn!(error = %err, "Skipping tile query");
                set.push_failure(
                    &directives.sli,
                    &SliQuery::Metrics {
                        query: format!("metricSelector={}", metric),
                    },
                    err.to_string(),
                );
                None
            }
        }
    }

    async fn run_tile_query(
        &self,
        tile_query: &TileQuery,
        directives: &TileDirectives,
        window: &TimeWindow,
        set: &mut SliSet,
    ) {
        let built = match build_metrics_query(self.placeholders, &tile_query.metric_query, window)
        {
            Ok(built) => built,
            Err(err) => {
                set.add_metrics_outcome(tile_query, directives, "", Err(err));
                return;
            }
        };
        let outcome = self.client.query_metrics(&built).await;
        set.add_metrics_outcome(tile_query, directives, &built.metric_id, outcome);
    }

    async fn process_usql(
        &self,
        usql: &str,
        visualization: &UsqlVisualization,
        directives: &TileDirectives,
        window: &TimeWindow,
        set: &mut SliSet,
    ) {
        let encoded = build_usql_query(self.placeholders, usql, window);
        let rows = match self.client.query_usql(&encoded).await.and_then(|result| {
            result
                .values
                .iter()
                .map(|row| visualization.extract(row))
                .collect::<Result<Vec<_>>>()
        }) {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(indicator = %directives.sli, error = %err, "USQL tile failed");
                let query = SliQuery::Usql {
                    visualization: visualization.clone(),
                    dimension: String::new(),
                    query: usql.to_string(),
                };
                set.push_failure(&clean_indicator_name(&directives.sli), &query, err.to_string());
                return;
            }
        };

        for (dimension, value) in rows.into_iter().flatten() {
            set.add_usql_row(directives, visualization, usql, dimension, value);
        }
    }
}

/// Title directives of a tile, or `None` when the tile did not opt in.
fn opted_in(tile: &Tile) -> Option<TileDirectives> {
    let directives = TileDirectives::parse(&tile.title);
    if directives.is_none() {
        tracing::debug!(title = %tile.title, "Tile not included: title has no sli=<name>");
    }
    directives
}

/// Objective for an SLO tile.
///
/// Both criteria are lower bounds on the evaluated percentage: pass at the SLO target,
/// warning at the SLO warning threshold. The warning bound is kept as configured even
/// when it lies above the target.
fn slo_objective(indicator: &str, slo: &SloResult) -> Objective {
    Objective {
        sli: indicator.to_string(),
        display_name: None,
        pass: Some(vec![SloCriteria {
            criteria: vec![format!(">={}", slo.effective_target())],
        }]),
        warning: Some(vec![SloCriteria {
            criteria: vec![format!(">={}", slo.effective_warning())],
        }]),
        weight: DEFAULT_OBJECTIVE_WEIGHT,
        key_sli: false,
    }
}

fn no_problems_objective(indicator: &str) -> Objective {
    Objective {
        sli: indicator.to_string(),
        display_name: None,
        pass: Some(vec![SloCriteria {
            criteria: vec![NO_PROBLEMS_CRITERIA.to_string()],
        }]),
        warning: None,
        weight: DEFAULT_OBJECTIVE_WEIGHT,
        key_sli: true,
    }
}
