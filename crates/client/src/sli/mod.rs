//! SLI/SLO derivation.
//!
//! - [`dashboard`]: dashboard resolution and the per-tile pass
//! - [`tiles`]: metric query generation for chart and data explorer tiles
//! - [`synthesizer`]: indicator expansion and document accumulation
//! - [`resolver`]: ad-hoc value resolution from stored queries
//! - [`title`], [`markdown`]: tile-level configuration
//! - [`naming`], [`scaling`], [`defaults`]: small shared rules

pub mod dashboard;
pub mod defaults;
pub mod markdown;
pub mod naming;
pub mod resolver;
pub mod scaling;
pub mod synthesizer;
pub mod tiles;
pub mod title;

pub use dashboard::{
    DashboardOutcome, DashboardProcessor, ProcessedDashboard, dashboard_link,
    dashboard_name_matches, has_dashboard_changed, is_valid_dashboard_id,
};
pub use defaults::default_query;
pub use markdown::apply_markdown;
pub use naming::clean_indicator_name;
pub use resolver::SliResolver;
pub use scaling::scale_value;
pub use synthesizer::SliSet;
pub use tiles::TileQuery;
pub use title::TileDirectives;
