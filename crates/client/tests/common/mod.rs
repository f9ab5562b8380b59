//! Common test utilities for integration tests.
//!
//! This module provides shared helper functions and re-exports commonly used
//! types for testing the Dynatrace client. All integration tests should use
//! these utilities to ensure consistency.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - All fixture files must be valid JSON
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)
//! - Test-specific assertions or test logic

// Re-export test utilities from dynatrace-client
#[allow(unused_imports)]
pub use dynatrace_client::testing::{fixed_window, load_fixture};

// Re-export commonly used types for test convenience
#[allow(unused_imports)]
pub use dynatrace_client::{DynatraceClient, PlaceholderResolver, TimeWindow};
#[allow(unused_imports)]
pub use dynatrace_config::DeliveryContext;
#[allow(unused_imports)]
pub use reqwest::Client;
#[allow(unused_imports)]
pub use dynatrace_client::endpoints;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const TEST_TOKEN: &str = "dt0c01.test-token";

#[allow(dead_code)]
pub const KQG_DASHBOARD_ID: &str = "ddb6a571-4bda-4e8b-a9c0-4a3e02c2e14a";

/// Build a client pointed at the mock server.
#[allow(dead_code)]
pub fn test_client(server: &MockServer) -> DynatraceClient {
    DynatraceClient::builder()
        .base_url(server.uri())
        .api_token(secrecy::SecretString::new(TEST_TOKEN.to_string().into()))
        .build()
        .expect("client should build")
}

/// Placeholders for the sockshop/staging/carts delivery.
#[allow(dead_code)]
pub fn sockshop_placeholders() -> PlaceholderResolver {
    PlaceholderResolver::new(
        DeliveryContext::new("sockshop", "staging", "carts").with_deployment("primary"),
        vec![],
    )
}
