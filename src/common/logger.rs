//! Logging setup for the chat server binaries.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Initialize the tracing subscriber from the loaded configuration.
///
/// The configured level applies as the global default, so library and binary
/// targets alike are covered; setting `RUST_LOG` overrides it entirely.
pub fn setup_logger(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
