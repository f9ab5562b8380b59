//! Parsing of per-service configuration file contents.
//!
//! Responsibilities:
//! - Decode `dynatrace.conf.yaml` content (credentials reference, dashboard, tag rules).
//! - Decode `sli.yaml` content (indicator name to query string map).
//!
//! Does NOT handle:
//! - Locating or fetching the files; callers pass the content in.
//! - Placeholder substitution inside the files (the client crate substitutes queries).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::loader::ConfigError;

/// A tag attached to monitored entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtTag {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Tags applied to entities of the listed types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtTagRule {
    #[serde(default)]
    pub me_types: Vec<String>,
    #[serde(default)]
    pub tags: Vec<DtTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DtAttachRules {
    #[serde(default)]
    pub tag_rule: Vec<DtTagRule>,
}

/// Content of a `dynatrace.conf.yaml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynatraceConfigFile {
    #[serde(default)]
    pub spec_version: String,
    /// Name of the secret holding tenant and token.
    #[serde(rename = "dtCreds", default, skip_serializing_if = "Option::is_none")]
    pub dt_creds: Option<String>,
    /// Dashboard setting: empty, `query` or a dashboard id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<String>,
    #[serde(
        rename = "attachRules",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub attach_rules: Option<DtAttachRules>,
}

impl DynatraceConfigFile {
    /// Parse `dynatrace.conf.yaml` content. Empty content yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::FileParse {
            file: "dynatrace.conf.yaml",
            source,
        })
    }
}

/// Content of an `sli.yaml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliFile {
    #[serde(default)]
    pub spec_version: String,
    #[serde(default)]
    pub indicators: BTreeMap<String, String>,
}

impl SliFile {
    /// Parse `sli.yaml` content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::FileParse {
            file: "sli.yaml",
            source,
        })
    }
}
