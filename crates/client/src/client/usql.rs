//! USQL API methods for [`DynatraceClient`].

use crate::client::DynatraceClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::UsqlResult;

impl DynatraceClient {
    /// Execute an encoded USQL table query.
    pub async fn query_usql(&self, encoded_query: &str) -> Result<UsqlResult> {
        endpoints::query_usql(
            &self.http,
            &self.base_url,
            self.token(),
            encoded_query,
            self.metrics.as_ref(),
        )
        .await
    }
}
