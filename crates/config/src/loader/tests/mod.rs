//! Tests for the configuration loader.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Environment mutations go through `temp_env` so they are restored on exit.


/// Every variable the loader reads, cleared for isolation.
pub(super) const LOADER_VARS: [&str; 8] = [
    "DT_TENANT",
    "DT_API_TOKEN",
    "DT_SKIP_VERIFY",
    "HTTP_SSL_VERIFY",
    "DT_TIMEOUT",
    "DT_PROXY",
    "DT_DASHBOARD",
    "DOTENV_DISABLED",
];

/// Run `f` with all loader variables unset except the given ones.
pub(super) fn with_loader_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let mut all: Vec<(&str, Option<&str>)> = LOADER_VARS.iter().map(|k| (*k, None)).collect();
    for (key, value) in vars {
        all.retain(|(k, _)| k != key);
        all.push((key, Some(value)));
    }
    temp_env::with_vars(all, f);
}
