//! Problems and security problems API methods for [`DynatraceClient`].

use crate::client::DynatraceClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{Problem, ProblemQueryResult, SecurityProblemQueryResult};
use crate::query::TimeWindow;

impl DynatraceClient {
    /// Query problems with a selector fragment such as `problemSelector=status(open)`.
    pub async fn query_problems(
        &self,
        query: &str,
        window: &TimeWindow,
    ) -> Result<ProblemQueryResult> {
        endpoints::query_problems(
            &self.http,
            &self.base_url,
            self.token(),
            query,
            window,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Fetch a single problem.
    pub async fn get_problem(&self, problem_id: &str) -> Result<Problem> {
        endpoints::get_problem(
            &self.http,
            &self.base_url,
            self.token(),
            problem_id,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Query security problems with a selector fragment.
    pub async fn query_security_problems(
        &self,
        query: &str,
        window: &TimeWindow,
    ) -> Result<SecurityProblemQueryResult> {
        endpoints::query_security_problems(
            &self.http,
            &self.base_url,
            self.token(),
            query,
            window,
            self.metrics.as_ref(),
        )
        .await
    }
}
