//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for all configuration loading failures.
//! - Define error variants for configuration file content parsing.
//!
//! Does NOT handle:
//! - Errors raised while talking to the Dynatrace API (see client crate).
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, file kinds, etc.).
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Dynatrace tenant is required. Set DT_TENANT or pass --base-url.")]
    MissingTenant,

    #[error("Dynatrace API token is required. Set DT_API_TOKEN or pass --api-token.")]
    MissingApiToken,

    #[error("invalid timeout: {message}")]
    InvalidTimeout { message: String },

    /// Failed to parse YAML configuration content.
    #[error("Failed to parse {file} content")]
    FileParse {
        file: &'static str,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}
