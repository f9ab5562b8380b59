//! Centralized constants for the Dynatrace SLI workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Name of the header carrying the API token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Scheme prefix for the API token header value.
pub const API_TOKEN_SCHEME: &str = "Api-Token";

// =============================================================================
// Dashboard Defaults
// =============================================================================

/// Sentinel value of the dashboard setting that triggers a dashboard search.
pub const DASHBOARD_QUERY: &str = "query";

/// Marker that enables change detection for a dashboard.
pub const PARSE_ON_CHANGE_MARKER: &str = "KQG.QueryBehavior=ParseOnChange";

/// Prefix that dashboard names must carry to be found by a dashboard search.
pub const DASHBOARD_NAME_PREFIX: &str = "kqg;";

// =============================================================================
// SLI / SLO Document Defaults
// =============================================================================

/// Spec version written into generated SLI documents.
pub const SLI_SPEC_VERSION: &str = "1.0";

/// Spec version written into generated SLO documents.
pub const SLO_SPEC_VERSION: &str = "1.0";

/// Default total score required to pass an evaluation.
pub const DEFAULT_TOTAL_SCORE_PASS: &str = "90%";

/// Default total score required for a warning.
pub const DEFAULT_TOTAL_SCORE_WARNING: &str = "75%";

/// Default weight of an objective.
pub const DEFAULT_OBJECTIVE_WEIGHT: i32 = 1;
