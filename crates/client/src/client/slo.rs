//! SLO API methods for [`DynatraceClient`].

use crate::client::DynatraceClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::SloResult;
use crate::query::TimeWindow;

impl DynatraceClient {
    /// Evaluate an SLO over a window.
    pub async fn get_slo(&self, slo_id: &str, window: &TimeWindow) -> Result<SloResult> {
        endpoints::get_slo(
            &self.http,
            &self.base_url,
            self.token(),
            slo_id,
            window,
            self.metrics.as_ref(),
        )
        .await
    }
}
