//! Dashboard API methods for [`DynatraceClient`].

use crate::client::DynatraceClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{Dashboard, DashboardStub};

impl DynatraceClient {
    /// List all dashboards.
    pub async fn list_dashboards(&self) -> Result<Vec<DashboardStub>> {
        endpoints::list_dashboards(&self.http, &self.base_url, self.token(), self.metrics.as_ref())
            .await
    }

    /// Fetch a dashboard as raw JSON.
    pub async fn get_dashboard_json(&self, dashboard_id: &str) -> Result<serde_json::Value> {
        endpoints::get_dashboard_json(
            &self.http,
            &self.base_url,
            self.token(),
            dashboard_id,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Fetch and decode a dashboard.
    pub async fn get_dashboard(&self, dashboard_id: &str) -> Result<Dashboard> {
        endpoints::get_dashboard(
            &self.http,
            &self.base_url,
            self.token(),
            dashboard_id,
            self.metrics.as_ref(),
        )
        .await
    }
}
