//! Stored SLI query strings.
//!
//! Responsibilities:
//! - Represent every kind of stored indicator query as a typed variant.
//! - Encode and decode the `<PREFIX>;<payload>` string form written to `sli.yaml`.
//!
//! Does NOT handle:
//! - Executing queries (see `sli::resolver`).
//!
//! Invariants:
//! - `query.to_string().parse::<SliQuery>()` yields `query` again for every variant.
//! - The string form is byte-compatible with previously persisted indicator files.

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;
use crate::models::UsqlVisualization;

const MV2_PREFIX: &str = "MV2;";
const USQL_PREFIX: &str = "USQL;";
const SLO_PREFIX: &str = "SLO;";
const PV2_PREFIX: &str = "PV2;";
const SECPV2_PREFIX: &str = "SECPV2;";

/// A stored indicator query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliQuery {
    /// `MV2;<unit>;<metrics query>`: metrics query with the unit used for scaling.
    MetricsV2 { unit: String, query: String },
    /// `USQL;<visualization>;<dimension>;<usql>`.
    Usql {
        visualization: UsqlVisualization,
        dimension: String,
        query: String,
    },
    /// `SLO;<slo id>`.
    Slo { id: String },
    /// `PV2;<problem query>`.
    Problems { query: String },
    /// `SECPV2;<security problem query>`.
    SecurityProblems { query: String },
    /// A bare metrics query without unit information.
    Metrics { query: String },
}

impl SliQuery {
    /// Short label of the query kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MetricsV2 { .. } => "MV2",
            Self::Usql { .. } => "USQL",
            Self::Slo { .. } => "SLO",
            Self::Problems { .. } => "PV2",
            Self::SecurityProblems { .. } => "SECPV2",
            Self::Metrics { .. } => "metrics",
        }
    }
}

impl fmt::Display for SliQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MetricsV2 { unit, query } => write!(f, "{}{};{}", MV2_PREFIX, unit, query),
            Self::Usql {
                visualization,
                dimension,
                query,
            } => write!(f, "{}{};{};{}", USQL_PREFIX, visualization, dimension, query),
            Self::Slo { id } => write!(f, "{}{}", SLO_PREFIX, id),
            Self::Problems { query } => write!(f, "{}{}", PV2_PREFIX, query),
            Self::SecurityProblems { query } => write!(f, "{}{}", SECPV2_PREFIX, query),
            Self::Metrics { query } => f.write_str(query),
        }
    }
}

impl FromStr for SliQuery {
    type Err = ClientError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ClientError::InvalidSliQuery {
            query: raw.to_string(),
            message: message.to_string(),
        };

        if let Some(rest) = raw.strip_prefix(MV2_PREFIX) {
            let (unit, query) = rest
                .split_once(';')
                .ok_or_else(|| invalid("expected MV2;<unit>;<query>"))?;
            return Ok(Self::MetricsV2 {
                unit: unit.to_string(),
                query: query.to_string(),
            });
        }

        if let Some(rest) = raw.strip_prefix(USQL_PREFIX) {
            let mut parts = rest.splitn(3, ';');
            let (Some(visualization), Some(dimension), Some(query)) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(invalid("expected USQL;<visualization>;<dimension>;<query>"));
            };
            return Ok(Self::Usql {
                visualization: UsqlVisualization::from(visualization),
                dimension: dimension.to_string(),
                query: query.to_string(),
            });
        }

        if let Some(id) = raw.strip_prefix(SLO_PREFIX) {
            if id.is_empty() || id.contains(';') {
                return Err(invalid("expected SLO;<slo id>"));
            }
            return Ok(Self::Slo { id: id.to_string() });
        }

        if let Some(query) = raw.strip_prefix(PV2_PREFIX) {
            if query.contains(';') {
                return Err(invalid("expected PV2;<problem query>"));
            }
            return Ok(Self::Problems {
                query: query.to_string(),
            });
        }

        if let Some(query) = raw.strip_prefix(SECPV2_PREFIX) {
            if query.contains(';') {
                return Err(invalid("expected SECPV2;<security problem query>"));
            }
            return Ok(Self::SecurityProblems {
                query: query.to_string(),
            });
        }

        Ok(Self::Metrics {
            query: raw.to_string(),
        })
    }
}
