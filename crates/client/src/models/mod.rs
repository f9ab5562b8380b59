//! Data models for Dynatrace API responses and generated SLI/SLO documents.
//!
//! Types are organized by API in submodules and re-exported here
//! for convenient access.

pub mod dashboards;
pub mod error;
pub mod metrics;
pub mod problems;
pub mod sli;
pub mod slo;
pub mod usql;

pub use dashboards::{
    ChartDimension, ChartSeries, Dashboard, DashboardFilter, DashboardList, DashboardMetadata,
    DashboardStub, DataExplorerQuery, FilterBy, FilterCriterion, FiltersPerEntityType,
    ManagementZone, NestedFilter, Tile, TileKind,
};
pub use error::{ApiErrorBody, ApiErrorEnvelope, ConstraintViolation};
pub use metrics::{
    DefaultAggregation, DimensionDefinition, MetricDefinition, MetricSeries,
    MetricSeriesCollection, MetricsQueryResult,
};
pub use problems::{
    EntityId, EntityStub, EntityTag, Problem, ProblemFilter, ProblemQueryResult, RiskAssessment,
    SecurityProblem, SecurityProblemQueryResult,
};
pub use sli::{
    Objective, ServiceLevelObjectives, SliDocument, SliResult, SloComparison, SloCriteria,
    SloScore,
};
pub use slo::SloResult;
pub use usql::{UsqlResult, UsqlValue, UsqlVisualization};
