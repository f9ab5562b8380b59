//! SLI results and the generated SLI / SLO documents.
//!
//! Responsibilities:
//! - `SliResult`: one measured (or failed) indicator value.
//! - `SliDocument`: indicator name to stored query string, the layout of an `sli.yaml`.
//! - `ServiceLevelObjectives`: objectives plus scoring policy, the layout of an `slo.yaml`.
//!
//! Invariants:
//! - Empty pass/warning criteria lists are omitted, never written as `[]`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use dynatrace_config::constants::{
    DEFAULT_TOTAL_SCORE_PASS, DEFAULT_TOTAL_SCORE_WARNING, SLI_SPEC_VERSION, SLO_SPEC_VERSION,
};

/// Outcome of measuring one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliResult {
    pub metric: String,
    pub value: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SliResult {
    pub fn success(metric: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
            success: true,
            message: None,
        }
    }

    /// A failed measurement: value 0 and the error text as message.
    pub fn failure(metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: 0.0,
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Indicator definitions generated from a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliDocument {
    pub spec_version: String,
    #[serde(default)]
    pub indicators: BTreeMap<String, String>,
}

impl Default for SliDocument {
    fn default() -> Self {
        Self {
            spec_version: SLI_SPEC_VERSION.to_string(),
            indicators: BTreeMap::new(),
        }
    }
}

/// One group of criteria; all must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SloCriteria {
    pub criteria: Vec<String>,
}

/// Objective for a single indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub sli: String,
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<Vec<SloCriteria>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<Vec<SloCriteria>>,
    pub weight: i32,
    #[serde(default)]
    pub key_sli: bool,
}

/// Total score thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SloScore {
    pub pass: String,
    pub warning: String,
}

impl Default for SloScore {
    fn default() -> Self {
        Self {
            pass: DEFAULT_TOTAL_SCORE_PASS.to_string(),
            warning: DEFAULT_TOTAL_SCORE_WARNING.to_string(),
        }
    }
}

/// How results are compared against previous evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SloComparison {
    pub compare_with: String,
    pub include_result_with_score: String,
    pub number_of_comparison_results: u32,
    pub aggregate_function: String,
}

impl Default for SloComparison {
    fn default() -> Self {
        Self {
            compare_with: "single_result".to_string(),
            include_result_with_score: "pass".to_string(),
            number_of_comparison_results: 1,
            aggregate_function: "avg".to_string(),
        }
    }
}

/// SLO document generated from a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLevelObjectives {
    pub spec_version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filter: BTreeMap<String, String>,
    pub comparison: SloComparison,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    pub total_score: SloScore,
}

impl Default for ServiceLevelObjectives {
    fn default() -> Self {
        Self {
            spec_version: SLO_SPEC_VERSION.to_string(),
            filter: BTreeMap::new(),
            comparison: SloComparison::default(),
            objectives: Vec::new(),
            total_score: SloScore::default(),
        }
    }
}
