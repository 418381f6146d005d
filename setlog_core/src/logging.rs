//! Logging infrastructure for Setlog.
//!
//! Centralized tracing setup shared by the library tests and the CLI.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at the default INFO level.
///
/// The level can be overridden with the RUST_LOG environment variable.
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific default level (debug, info, warn, error).
///
/// RUST_LOG still takes precedence when set.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}
