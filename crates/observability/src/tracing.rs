//! Tracing/logging initialization.
//!
//! The authorization engine emits `debug` events for ordinary denials and
//! `warn` events for separation-of-duty violations; hosts pick the
//! verbosity through `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Initialize JSON-formatted tracing for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with_default("info");
}

/// Initialize with an explicit fallback filter used when `RUST_LOG` is not
/// set (e.g. `"metagov_authz=debug"` to trace every denial).
pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
