//! Shared test utilities for dynatrace-sli integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Ensure consistent test environment setup (token, tenant).
//!
//! Invariants / Assumptions:
//! - `DT_API_TOKEN` is set to "test-token" unless overridden.

use assert_cmd::Command;

#[allow(unused_imports)]
pub use dynatrace_client::testing::load_fixture;

#[allow(dead_code)]
pub const KQG_DASHBOARD_ID: &str = "ddb6a571-4bda-4e8b-a9c0-4a3e02c2e14a";

/// Returns a hermetic `dynatrace-sli` command for integration testing.
pub fn dynatrace_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dynatrace-sli");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("DT_API_TOKEN", "test-token");

    cmd.env_remove("DT_TENANT")
        .env_remove("DT_DASHBOARD")
        .env_remove("DT_TIMEOUT")
        .env_remove("DT_PROXY")
        .env_remove("DT_SKIP_VERIFY")
        .env_remove("HTTP_SSL_VERIFY");

    cmd
}

/// A hermetic command pointed at `base_url`.
#[allow(dead_code)]
pub fn dynatrace_cmd_with_base_url(base_url: &str) -> Command {
    let mut cmd = dynatrace_cmd();
    cmd.env("DT_TENANT", base_url);
    cmd
}
