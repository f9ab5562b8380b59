//! Serde helpers for Dynatrace's loosely typed dashboard JSON.
//!
//! Responsibilities:
//! - Accept explicit `null` wherever a field has a natural default.
//! - Accept either JSON numbers or strings for numeric fields.
//!
//! Explicitly does NOT handle:
//! - Validating higher-level semantics (tile types, query syntax).
//! - Normalizing units or performing domain conversions.
//!
//! Invariants / assumptions:
//! - Dashboard documents edited by hand frequently carry `null` for lists and strings.
//! - These helpers must not log or print secrets; errors should be generic parse errors.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    U64(u64),
    I64(i64),
    F64(f64),
}

/// Deserialize a value, mapping JSON `null` to `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize an optional float that may arrive as a number or a numeric string.
pub fn opt_f64_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(StringOrNumber::String(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOrNumber::String(s)) => s.trim().parse::<f64>().map_err(D::Error::custom).map(Some),
        Some(StringOrNumber::U64(v)) => Ok(Some(v as f64)),
        Some(StringOrNumber::I64(v)) => Ok(Some(v as f64)),
        Some(StringOrNumber::F64(v)) => Ok(Some(v)),
    }
}

/// Deserialize an optional string that may arrive as a number.
pub fn opt_string_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(StringOrNumber::String(s)) => Ok(Some(s)),
        Some(StringOrNumber::U64(v)) => Ok(Some(v.to_string())),
        Some(StringOrNumber::I64(v)) => Ok(Some(v.to_string())),
        Some(StringOrNumber::F64(v)) => Ok(Some(v.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "null_as_default")]
        names: Vec<String>,
        #[serde(default, deserialize_with = "opt_f64_from_number_or_string")]
        percentile: Option<f64>,
        #[serde(default, deserialize_with = "opt_string_from_number_or_string")]
        id: Option<String>,
    }

    #[test]
    fn test_null_list_becomes_empty() {
        let h: Holder = serde_json::from_str(r#"{"names": null}"#).unwrap();
        assert!(h.names.is_empty());
        assert!(h.percentile.is_none());
    }

    #[test]
    fn test_percentile_number_or_string() {
        let h: Holder = serde_json::from_str(r#"{"percentile": 90}"#).unwrap();
        assert_eq!(h.percentile, Some(90.0));
        let h: Holder = serde_json::from_str(r#"{"percentile": "95.5"}"#).unwrap();
        assert_eq!(h.percentile, Some(95.5));
        let h: Holder = serde_json::from_str(r#"{"percentile": ""}"#).unwrap();
        assert_eq!(h.percentile, None);
        assert!(serde_json::from_str::<Holder>(r#"{"percentile": "high"}"#).is_err());
    }

    #[test]
    fn test_id_number_or_string() {
        let h: Holder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(h.id.as_deref(), Some("42"));
    }
}
