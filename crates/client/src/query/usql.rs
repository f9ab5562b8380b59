//! User session query (USQL) request construction.

use crate::query::params::QueryParams;
use crate::query::placeholders::PlaceholderResolver;
use crate::query::window::TimeWindow;

/// Path of the USQL table endpoint.
pub const USQL_TABLE_PATH: &str = "/api/v1/userSessionQueryLanguage/table";

/// Encoded query string for a USQL table request, without the leading `?`.
pub fn build_usql_query(
    placeholders: &PlaceholderResolver,
    query: &str,
    window: &TimeWindow,
) -> String {
    let usql = placeholders.apply(query);
    tracing::debug!(query = %usql, "Building USQL query");

    let mut params = QueryParams::new();
    params.add("query", usql);
    params.add("explain", "false");
    params.add("addDeepLinkFields", "false");
    params.add("startTimestamp", window.start_millis());
    params.add("endTimestamp", window.end_millis());
    params.encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use dynatrace_config::DeliveryContext;

    #[test]
    fn test_usql_query_sorted_and_substituted() {
        let resolver =
            PlaceholderResolver::new(DeliveryContext::new("sockshop", "staging", "carts"), vec![]);
        let window = TimeWindow::new(
            Utc.timestamp_millis_opt(10).unwrap(),
            Utc.timestamp_millis_opt(20).unwrap(),
        );
        let encoded = build_usql_query(
            &resolver,
            "SELECT count(*) FROM usersession WHERE stage='$STAGE'",
            &window,
        );
        assert_eq!(
            encoded,
            "addDeepLinkFields=false&endTimestamp=20&explain=false&query=SELECT+count%28*%29+FROM+usersession+WHERE+stage%3D%27staging%27&startTimestamp=10"
        );
    }
}
