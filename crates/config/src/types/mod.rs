//! Configuration type definitions for the Dynatrace SLI engine.
//!
//! Responsibilities:
//! - Define connection, authentication, delivery context and SLI settings types.
//! - Provide serialization helpers for sensitive types (secrets, durations).
//!
//! Does NOT handle:
//! - Configuration loading from environment variables (see `loader` module).
//! - Parsing configuration file contents (see `files` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - All secret types use `secrecy::SecretString` to prevent accidental logging.
//! - Every type is immutable once handed to the engine; nothing reads process state.

mod auth;
pub(crate) mod connection;
mod context;
mod sli;

pub use auth::AuthConfig;
pub use connection::{Config, ConnectionConfig, normalize_tenant_url};
pub use context::DeliveryContext;
pub use sli::{DashboardReference, SliFilter, SliSettings};
