//! Strict query-string parsing and sorted form-urlencoded emission.
//!
//! Responsibilities:
//! - Parse `key=value&key=value` fragments, rejecting malformed percent escapes and empty keys.
//! - Keep every value of a repeated key in insertion order.
//! - Emit parameters sorted by key, form-urlencoded.
//!
//! Does NOT handle:
//! - Placeholder substitution (see `placeholders`).
//! - Knowledge of which keys the Metrics API understands (see `metrics`).

use std::collections::BTreeMap;

use crate::error::{ClientError, Result};

/// Multi-valued query parameters kept in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, Vec<String>>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw fragment such as `metricSelector=a:merge(0)&entitySelector=type(SERVICE)`.
    ///
    /// Empty segments (`a=1&&b=2`) are ignored; a segment without `=` is a key with an
    /// empty value.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut params = Self::new();
        for segment in raw.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            let key = decode_component(key)?;
            if key.is_empty() {
                return Err(ClientError::QueryBuild(format!(
                    "empty parameter name in '{}'",
                    segment
                )));
            }
            params.add(key, decode_component(value)?);
        }
        Ok(params)
    }

    /// Append a value for `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// First value of `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Remove every value of `key`, returning them.
    pub fn remove(&mut self, key: &str) -> Vec<String> {
        self.entries.remove(key).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Form-urlencode all parameters, sorted by key.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.entries {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

/// Decode one form-urlencoded component: `+` is a space, `%XX` must be valid hex.
fn decode_component(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() >= i + 3
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(ClientError::QueryBuild(format!(
                    "invalid percent escape in '{}'",
                    raw
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = raw.replace('+', " ");
    percent_encoding::percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ClientError::QueryBuild(format!("invalid UTF-8 in '{}': {}", raw, e)))
}
