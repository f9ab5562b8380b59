//! Query construction for the Dynatrace APIs.
//!
//! Responsibilities:
//! - Placeholder substitution in query fragments.
//! - Metrics API v2 and USQL request query strings.
//! - The typed form of stored SLI query strings.
//!
//! Does NOT handle:
//! - HTTP transport (see `endpoints`).

pub mod metrics;
pub mod params;
pub mod placeholders;
pub mod sli_query;
pub mod usql;
pub mod window;

pub use metrics::{MetricsQuery, build_metrics_query, is_matching_metric_id};
pub use params::QueryParams;
pub use placeholders::PlaceholderResolver;
pub use sli_query::SliQuery;
pub use usql::build_usql_query;
pub use window::TimeWindow;
