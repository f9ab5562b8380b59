//! SLO API v2 models.

use serde::{Deserialize, Serialize};

use crate::serde_helpers::null_as_default;

/// Evaluation-error marker of a healthy SLO result.
pub const SLO_ERROR_NONE: &str = "NONE";

/// Response of `GET /api/v2/slo/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SloResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub evaluated_percentage: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_budget: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub use_rate_metric: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_rate: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_numerator: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric_denominator: String,
    /// Success target of older API versions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_success: f64,
    /// Warning target of older API versions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_warning: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warning: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub evaluation_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_window: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter: String,
}

impl SloResult {
    /// Pass threshold, falling back to the legacy field when unset.
    pub fn effective_target(&self) -> f64 {
        if self.target <= 0.0 {
            self.target_success
        } else {
            self.target
        }
    }

    /// Warning threshold, falling back to the legacy field when unset.
    pub fn effective_warning(&self) -> f64 {
        if self.warning <= 0.0 {
            self.target_warning
        } else {
            self.warning
        }
    }

    /// Whether the backend reported an evaluation error.
    pub fn has_error(&self) -> bool {
        !self.error.is_empty() && self.error != SLO_ERROR_NONE
    }
}
