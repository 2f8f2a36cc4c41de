//! Tracing setup for the wplan binary.
//!
//! Logs always go to stderr so plan output on stdout can be piped (e.g. the
//! `--json` output into `jq`).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when RUST_LOG is unset and verbose output was not requested
pub const DEFAULT_LEVEL: &str = "warn";

/// Initialize logging, at `debug` when `verbose` is set
pub fn init(verbose: bool) {
    init_with_level(if verbose { "debug" } else { DEFAULT_LEVEL })
}

/// Initialize logging with a specific default level
///
/// RUST_LOG still takes precedence when set.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("trace"))
        .try_init();
}
