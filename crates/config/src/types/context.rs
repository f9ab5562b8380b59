//! Delivery context used for placeholder substitution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of the delivery event an SLI retrieval runs for.
///
/// Every field substitutes one `$PLACEHOLDER` in query fragments; labels
/// substitute `$LABEL.<key>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryContext {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub deployment: String,
    #[serde(default)]
    pub test_strategy: String,
    /// Keptn context id (`$CONTEXT`).
    #[serde(default)]
    pub keptn_context: String,
    /// Event type (`$EVENT`).
    #[serde(default)]
    pub event: String,
    /// Event source (`$SOURCE`).
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl DeliveryContext {
    /// Context with the three coordinates a dashboard search needs.
    pub fn new(
        project: impl Into<String>,
        stage: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            stage: stage.into(),
            service: service.into(),
            ..Self::default()
        }
    }

    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = deployment.into();
        self
    }

    pub fn with_test_strategy(mut self, test_strategy: impl Into<String>) -> Self {
        self.test_strategy = test_strategy.into();
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}
