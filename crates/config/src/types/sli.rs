//! SLI retrieval settings.
//!
//! Responsibilities:
//! - Describe which dashboard (if any) drives SLI derivation.
//! - Carry custom query overrides and custom placeholder filters.
//!
//! Invariants:
//! - `DashboardReference` round-trips through its setting string: `""`, `"query"`
//!   or a dashboard id.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::DASHBOARD_QUERY;

/// Which dashboard an SLI retrieval should use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DashboardReference {
    /// Dashboard mode not requested.
    #[default]
    NotSet,
    /// Search for a dashboard named after project, stage and service.
    Query,
    /// Explicit dashboard id (validated when loaded).
    Id(String),
}

impl DashboardReference {
    /// Interpret a raw dashboard setting.
    pub fn from_setting(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Self::NotSet
        } else if value == DASHBOARD_QUERY {
            Self::Query
        } else {
            Self::Id(value.to_string())
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Self::NotSet)
    }
}

impl fmt::Display for DashboardReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSet => Ok(()),
            Self::Query => f.write_str(DASHBOARD_QUERY),
            Self::Id(id) => f.write_str(id),
        }
    }
}

impl Serialize for DashboardReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DashboardReference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(Self::from_setting)
            .unwrap_or_default())
    }
}

/// A custom placeholder filter: `$key` / `$KEY` is replaced by `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliFilter {
    pub key: String,
    pub value: String,
}

impl SliFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Settings that shape a single SLI retrieval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliSettings {
    #[serde(default)]
    pub dashboard: DashboardReference,
    /// Indicator name to query string overrides (from `sli.yaml`).
    #[serde(default)]
    pub custom_queries: BTreeMap<String, String>,
    #[serde(default)]
    pub custom_filters: Vec<SliFilter>,
}
