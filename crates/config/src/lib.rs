//! Configuration management for the Dynatrace SLI engine.
//!
//! This crate provides the explicit, immutable configuration the SLI engine
//! is constructed with: tenant connection settings, API token auth, the
//! delivery context used for placeholder substitution, and the SLI settings
//! (dashboard reference, custom queries, custom filters).

pub mod constants;
pub mod files;
mod loader;
pub mod types;

pub use files::{DynatraceConfigFile, SliFile};
pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{
    AuthConfig, Config, ConnectionConfig, DashboardReference, DeliveryContext, SliFilter,
    SliSettings, normalize_tenant_url,
};
