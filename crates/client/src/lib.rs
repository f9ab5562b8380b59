//! Dynatrace API client and SLI/SLO engine.
//!
//! This crate talks to the Dynatrace Dashboards, Metrics v2, SLO v2, Problems v2,
//! Security Problems v2 and USQL APIs, and derives quality-gate indicators and
//! objectives from dashboards or from stored SLI queries.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod models;
pub mod query;
mod serde_helpers;
pub mod sli;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use client::DynatraceClient;
pub use client::builder::DynatraceClientBuilder;
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{
    Dashboard, DashboardStub, MetricDefinition, MetricsQueryResult, Objective,
    ServiceLevelObjectives, SliDocument, SliResult, SloCriteria, SloResult, Tile, TileKind,
};
pub use query::{PlaceholderResolver, SliQuery, TimeWindow};
pub use sli::{DashboardOutcome, DashboardProcessor, ProcessedDashboard, SliResolver, SliSet};
