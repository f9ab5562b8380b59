//! Tile title directives.
//!
//! A tile opts into SLI evaluation through its title, e.g.
//! `sli=svc_rt;pass=<+10%,<600;warning=<=800;weight=2;key=true`.
//!
//! Invariants:
//! - Segments are split on `;`, each at its first `=`; keys are case-insensitive.
//! - Every `pass`/`warning` segment adds one criteria group.
//! - A title without a non-empty `sli=` yields no directives.

use crate::models::{Objective, SloCriteria};
use dynatrace_config::constants::DEFAULT_OBJECTIVE_WEIGHT;

/// SLI/SLO settings parsed from a tile title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDirectives {
    /// Base indicator name, before dimension expansion and cleaning.
    pub sli: String,
    pub pass: Vec<SloCriteria>,
    pub warning: Vec<SloCriteria>,
    pub weight: i32,
    pub key_sli: bool,
}

impl TileDirectives {
    /// Parse a title; `None` when it carries no `sli=` name.
    pub fn parse(title: &str) -> Option<Self> {
        let mut directives = Self {
            sli: String::new(),
            pass: Vec::new(),
            warning: Vec::new(),
            weight: DEFAULT_OBJECTIVE_WEIGHT,
            key_sli: false,
        };

        for segment in title.split(';') {
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };
            match key.trim().to_ascii_lowercase().as_str() {
                "sli" => directives.sli = value.trim().to_string(),
                "pass" => directives.pass.push(criteria(value)),
                "warning" => directives.warning.push(criteria(value)),
                "weight" => match value.trim().parse() {
                    Ok(weight) => directives.weight = weight,
                    Err(_) => tracing::debug!(value, "Ignoring non-integer weight"),
                },
                "key" => directives.key_sli = parse_bool(value),
                _ => {}
            }
        }

        if directives.sli.is_empty() {
            None
        } else {
            Some(directives)
        }
    }

    /// Objective for one indicator derived from this tile.
    pub fn objective(&self, indicator: &str) -> Objective {
        Objective {
            sli: indicator.to_string(),
            display_name: None,
            pass: non_empty(&self.pass),
            warning: non_empty(&self.warning),
            weight: self.weight,
            key_sli: self.key_sli,
        }
    }
}

fn criteria(value: &str) -> SloCriteria {
    SloCriteria {
        criteria: value.split(',').map(|c| c.trim().to_string()).collect(),
    }
}

fn non_empty(groups: &[SloCriteria]) -> Option<Vec<SloCriteria>> {
    if groups.is_empty() {
        None
    } else {
        Some(groups.to_vec())
    }
}

/// Boolean spellings accepted in titles; anything else is false.
fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "t" | "T" | "true" | "TRUE" | "True")
}
