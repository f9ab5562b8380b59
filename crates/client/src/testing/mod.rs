//! Testing utilities for Dynatrace client tests.
//!
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use dynatrace_client::testing::load_fixture;
//!
//! let dashboard = load_fixture("dashboards/kqg_dashboard.json");
//! ```

use std::path::Path;

/// Load a JSON fixture file from the fixtures directory.
///
/// # Arguments
/// * `fixture_path` - Relative path within the fixtures directory (e.g., "dashboards/list.json")
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let full_path = manifest_dir.join("fixtures").join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}

/// A fixed evaluation window, 2020-01-01T00:00:00Z plus five minutes.
pub fn fixed_window() -> crate::query::TimeWindow {
    use chrono::TimeZone;

    let start = chrono::Utc.timestamp_millis_opt(1_577_836_800_000).unwrap();
    let end = chrono::Utc.timestamp_millis_opt(1_577_837_100_000).unwrap();
    crate::query::TimeWindow::new(start, end)
}
