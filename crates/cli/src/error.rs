//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ClientError` and `ConfigError` values to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see `main` for Ctrl+C handling).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use dynatrace_client::ClientError;
use dynatrace_config::ConfigError;

/// Structured exit codes for dynatrace-sli.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Authentication failure - the API token was rejected.
    AuthenticationFailed = 2,

    /// Connection error - network, timeout, or DNS failure.
    ///
    /// Scripts may retry with exponential backoff.
    ConnectionError = 3,

    /// Resource not found - dashboard, metric, SLO or problem.
    NotFound = 4,

    /// Validation error - bad configuration, malformed query or dashboard id.
    ///
    /// Scripts should fix the input and not retry the same request.
    ValidationError = 5,

    /// Permission denied - the token lacks a required scope.
    PermissionDenied = 6,

    /// Rate limited - HTTP 429 Too Many Requests.
    RateLimited = 7,

    /// Service unavailable - HTTP 502/503/504.
    ServiceUnavailable = 8,

    /// The API answered but carried no usable value.
    NoData = 9,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }

    /// Returns true if this exit code indicates a retryable condition.
    #[allow(dead_code)]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            ExitCode::ConnectionError | ExitCode::RateLimited | ExitCode::ServiceUnavailable
        )
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::Api { status: 400, .. } => ExitCode::ValidationError,
            ClientError::Api { status: 401, .. } => ExitCode::AuthenticationFailed,
            ClientError::Api { status: 403, .. } => ExitCode::PermissionDenied,
            ClientError::Api { status: 404, .. } => ExitCode::NotFound,
            ClientError::Api { status: 429, .. } => ExitCode::RateLimited,
            ClientError::Api {
                status: 502..=504, ..
            } => ExitCode::ServiceUnavailable,
            ClientError::Api { .. } => ExitCode::GeneralError,

            ClientError::Unreachable(_) | ClientError::InvalidUrl(_) => ExitCode::ConnectionError,

            ClientError::QueryBuild(_)
            | ClientError::InvalidDashboardId(_)
            | ClientError::InvalidSliQuery { .. }
            | ClientError::UnsupportedSli(_)
            | ClientError::InvalidConfig(_) => ExitCode::ValidationError,

            ClientError::NoData(_) | ClientError::AmbiguousResult { .. } => ExitCode::NoData,

            ClientError::MetricLookup { source, .. } => Self::from(source.as_ref()),

            ClientError::InvalidResponse(_) | ClientError::SloEvaluation { .. } => {
                ExitCode::GeneralError
            }
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(client_err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(client_err);
            }
            if cause.downcast_ref::<ConfigError>().is_some() {
                return ExitCode::ValidationError;
            }
        }
        ExitCode::GeneralError
    }
}
