//! `KQG.` settings carried by markdown tiles.

use crate::models::ServiceLevelObjectives;

/// Marker that makes a markdown tile relevant.
pub const KQG_MARKER: &str = "KQG.";

const INCLUDE_WITH_SCORE: [&str; 3] = ["pass", "all", "pass_or_warn"];
const AGGREGATE_FUNCTIONS: [&str; 4] = ["avg", "p50", "p90", "p95"];

/// Apply `KQG.*=value` settings from a markdown tile to the SLO document.
///
/// Settings are `;`-separated and keys are case-insensitive. Unknown keys and
/// segments that are not `key=value` are ignored.
pub fn apply_markdown(markdown: &str, slo: &mut ServiceLevelObjectives) {
    for segment in markdown.split(';') {
        let parts: Vec<&str> = segment.split('=').collect();
        if parts.len() != 2 {
            continue;
        }
        let value = parts[1].trim();
        match parts[0].trim().to_ascii_lowercase().as_str() {
            "kqg.total.pass" => slo.total_score.pass = value.to_string(),
            "kqg.total.warning" => slo.total_score.warning = value.to_string(),
            "kqg.compare.withscore" => {
                slo.comparison.include_result_with_score = if INCLUDE_WITH_SCORE.contains(&value) {
                    value.to_string()
                } else {
                    "pass".to_string()
                };
            }
            "kqg.compare.results" => {
                let results = value.parse::<u32>().unwrap_or(1);
                slo.comparison.number_of_comparison_results = results;
                slo.comparison.compare_with = if results > 1 {
                    "several_results".to_string()
                } else {
                    "single_result".to_string()
                };
            }
            "kqg.compare.function" => {
                slo.comparison.aggregate_function = if AGGREGATE_FUNCTIONS.contains(&value) {
                    value.to_string()
                } else {
                    "avg".to_string()
                };
            }
            _ => {}
        }
    }
}
