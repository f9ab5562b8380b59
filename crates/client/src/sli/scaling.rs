//! Unit scaling of metric values.

/// Unit reported for microsecond metrics.
pub const UNIT_MICROSECOND: &str = "MicroSecond";
/// Unit reported for byte metrics.
pub const UNIT_BYTE: &str = "Byte";

const RESPONSE_TIME_METRIC: &str = "builtin:service.response.time";

/// Scale a raw value: microseconds to milliseconds, bytes to kilobytes.
///
/// Service response time is always reported in microseconds, so it is scaled even
/// when the unit is unknown (bare legacy queries carry no unit).
pub fn scale_value(metric_id: &str, unit: &str, value: f64) -> f64 {
    if unit == UNIT_MICROSECOND || metric_id.contains(RESPONSE_TIME_METRIC) {
        return value / 1000.0;
    }
    if unit == UNIT_BYTE {
        return value / 1024.0;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microseconds_to_millis() {
        assert_eq!(scale_value("calc:service.x", "MicroSecond", 250_000.0), 250.0);
    }

    #[test]
    fn test_response_time_scaled_without_unit() {
        assert_eq!(
            scale_value("builtin:service.response.time", "", 1500.0),
            1.5
        );
    }

    #[test]
    fn test_bytes_to_kilobytes() {
        assert_eq!(scale_value("builtin:host.mem.used", "Byte", 2048.0), 2.0);
    }

    #[test]
    fn test_other_units_untouched() {
        assert_eq!(scale_value("builtin:service.errors.total.rate", "Percent", 3.5), 3.5);
        assert_eq!(scale_value("builtin:service.requestCount.total", "Count", 42.0), 42.0);
    }
}
