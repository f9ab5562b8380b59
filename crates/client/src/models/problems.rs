//! Problems and security problems API v2 models.

use serde::{Deserialize, Serialize};

use crate::serde_helpers::{null_as_default, opt_string_from_number_or_string};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityId {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub entity_type: String,
}

/// An entity referenced by a problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStub {
    #[serde(default)]
    pub entity_id: EntityId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTag {
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub string_representation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemFilter {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A single problem, as returned by `GET /api/v2/problems/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub problem_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub impact_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub affected_entities: Vec<EntityStub>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub impacted_entities: Vec<EntityStub>,
    #[serde(default)]
    pub root_cause_entity: Option<EntityStub>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub management_zones: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_tags: Vec<EntityTag>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub problem_filters: Vec<ProblemFilter>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_time: i64,
}

/// Response of `GET /api/v2/problems`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemQueryResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_size: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub problems: Vec<Problem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exposed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sensitive_data_affected: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_exploit_available: bool,
}

/// One entry of the security problem listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityProblem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub security_problem_id: String,
    #[serde(default, deserialize_with = "opt_string_from_number_or_string")]
    pub display_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vulnerability_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vulnerability_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_seen_timestamp: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_updated_timestamp: i64,
    #[serde(default)]
    pub risk_assessment: Option<RiskAssessment>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub management_zones: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vulnerable_entities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exposed_entities: Vec<String>,
}

/// Response of `GET /api/v2/securityProblems`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityProblemQueryResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_size: u64,
    #[serde(default)]
    pub next_page_key: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub security_problems: Vec<SecurityProblem>,
}
