//! User session query (USQL) models.
//!
//! Responsibilities:
//! - Decode USQL table responses with explicitly typed cells.
//! - Extract `(dimension, value)` pairs from a row according to the tile visualization.
//!
//! Invariants:
//! - A row cell of the wrong type is an error, never a silent zero.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClientError, Result};
use crate::serde_helpers::null_as_default;

/// One cell of a USQL result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UsqlValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl UsqlValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Null => "null",
        }
    }
}

/// Response of `GET /api/v1/userSessionQueryLanguage/table`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsqlResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub extrapolation_level: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub column_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<Vec<UsqlValue>>,
}

/// Visualization of a USQL tile; decides which columns hold dimension and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsqlVisualization {
    SingleValue,
    PieChart,
    ColumnChart,
    Table,
    Other(String),
}

impl From<&str> for UsqlVisualization {
    fn from(raw: &str) -> Self {
        match raw {
            "SINGLE_VALUE" => Self::SingleValue,
            "PIE_CHART" => Self::PieChart,
            "COLUMN_CHART" => Self::ColumnChart,
            "TABLE" => Self::Table,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for UsqlVisualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleValue => f.write_str("SINGLE_VALUE"),
            Self::PieChart => f.write_str("PIE_CHART"),
            Self::ColumnChart => f.write_str("COLUMN_CHART"),
            Self::Table => f.write_str("TABLE"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

impl UsqlVisualization {
    /// Extract `(dimension, value)` from one row.
    ///
    /// Returns `Ok(None)` for visualizations that carry no SLI values. Single values have
    /// an empty dimension.
    pub fn extract(&self, row: &[UsqlValue]) -> Result<Option<(String, f64)>> {
        let pair = match self {
            Self::SingleValue => (String::new(), number_at(row, 0)?),
            Self::PieChart | Self::ColumnChart => (text_at(row, 0)?, number_at(row, 1)?),
            Self::Table => {
                let last = row.len().checked_sub(1).ok_or_else(|| {
                    ClientError::InvalidResponse("empty USQL table row".to_string())
                })?;
                (text_at(row, 0)?, number_at(row, last)?)
            }
            Self::Other(kind) => {
                tracing::debug!(visualization = %kind, "Unsupported USQL visualization");
                return Ok(None);
            }
        };
        Ok(Some(pair))
    }
}

fn cell(row: &[UsqlValue], ix: usize) -> Result<&UsqlValue> {
    row.get(ix).ok_or_else(|| {
        ClientError::InvalidResponse(format!(
            "USQL row has {} columns, expected column {}",
            row.len(),
            ix
        ))
    })
}

fn number_at(row: &[UsqlValue], ix: usize) -> Result<f64> {
    match cell(row, ix)? {
        UsqlValue::Number(n) => Ok(*n),
        other => Err(ClientError::InvalidResponse(format!(
            "USQL column {} is {}, expected number",
            ix,
            other.kind()
        ))),
    }
}

fn text_at(row: &[UsqlValue], ix: usize) -> Result<String> {
    match cell(row, ix)? {
        UsqlValue::Text(s) => Ok(s.clone()),
        other => Err(ClientError::InvalidResponse(format!(
            "USQL column {} is {}, expected text",
            ix,
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(json: &str) -> Vec<UsqlValue> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decode_mixed_row() {
        let r = row(r#"["iOS", 12.5, true, null]"#);
        assert_eq!(
            r,
            vec![
                UsqlValue::Text("iOS".to_string()),
                UsqlValue::Number(12.5),
                UsqlValue::Bool(true),
                UsqlValue::Null
            ]
        );
    }

    #[test]
    fn test_extract_by_visualization() {
        assert_eq!(
            UsqlVisualization::SingleValue.extract(&row("[42]")).unwrap(),
            Some((String::new(), 42.0))
        );
        assert_eq!(
            UsqlVisualization::PieChart.extract(&row(r#"["Android", 7]"#)).unwrap(),
            Some(("Android".to_string(), 7.0))
        );
        assert_eq!(
            UsqlVisualization::Table
                .extract(&row(r#"["Chrome", 1, 2, 3.5]"#))
                .unwrap(),
            Some(("Chrome".to_string(), 3.5))
        );
        assert_eq!(
            UsqlVisualization::from("LINE_CHART").extract(&row("[1]")).unwrap(),
            None
        );
    }

    #[test]
    fn test_extract_type_mismatch_is_error() {
        let err = UsqlVisualization::ColumnChart
            .extract(&row(r#"[1, "x"]"#))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
        assert!(UsqlVisualization::Table.extract(&[]).is_err());
        assert!(UsqlVisualization::SingleValue.extract(&row("[null]")).is_err());
    }

    #[test]
    fn test_visualization_display_round_trip() {
        for raw in ["SINGLE_VALUE", "PIE_CHART", "COLUMN_CHART", "TABLE", "FUNNEL"] {
            assert_eq!(UsqlVisualization::from(raw).to_string(), raw);
        }
    }
}
