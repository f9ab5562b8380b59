//! Built-in indicator queries used when no custom query is configured.

pub const THROUGHPUT: &str = "throughput";
pub const ERROR_RATE: &str = "error_rate";
pub const RESPONSE_TIME_P50: &str = "response_time_p50";
pub const RESPONSE_TIME_P90: &str = "response_time_p90";
pub const RESPONSE_TIME_P95: &str = "response_time_p95";

const SERVICE_ENTITY_SELECTOR: &str = "&entitySelector=type(SERVICE),tag(keptn_project:$PROJECT),tag(keptn_stage:$STAGE),tag(keptn_service:$SERVICE),tag(keptn_deployment:$DEPLOYMENT)";

/// Metric selector of a default indicator, without the entity selector.
fn default_metric_selector(name: &str) -> Option<&'static str> {
    match name {
        THROUGHPUT => Some("metricSelector=builtin:service.requestCount.total:merge(0):sum"),
        ERROR_RATE => Some("metricSelector=builtin:service.errors.total.rate:merge(0):avg"),
        RESPONSE_TIME_P50 => {
            Some("metricSelector=builtin:service.response.time:merge(0):percentile(50)")
        }
        RESPONSE_TIME_P90 => {
            Some("metricSelector=builtin:service.response.time:merge(0):percentile(90)")
        }
        RESPONSE_TIME_P95 => {
            Some("metricSelector=builtin:service.response.time:merge(0):percentile(95)")
        }
        _ => None,
    }
}

/// Default query template for `name`, with delivery placeholders still unresolved.
pub fn default_query(name: &str) -> Option<String> {
    default_metric_selector(name).map(|selector| format!("{}{}", selector, SERVICE_ENTITY_SELECTOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_template() {
        assert_eq!(
            default_query(THROUGHPUT).unwrap(),
            "metricSelector=builtin:service.requestCount.total:merge(0):sum&entitySelector=type(SERVICE),tag(keptn_project:$PROJECT),tag(keptn_stage:$STAGE),tag(keptn_service:$SERVICE),tag(keptn_deployment:$DEPLOYMENT)"
        );
    }

    #[test]
    fn test_percentiles() {
        for (name, p) in [
            (RESPONSE_TIME_P50, "50"),
            (RESPONSE_TIME_P90, "90"),
            (RESPONSE_TIME_P95, "95"),
        ] {
            let query = default_query(name).unwrap();
            assert!(query.contains(&format!(":percentile({})&entitySelector=", p)));
        }
    }

    #[test]
    fn test_unknown_indicator() {
        assert!(default_query("response_time_p99").is_none());
    }
}
