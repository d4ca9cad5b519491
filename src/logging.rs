//! Logging system initialization
//!
//! Sets up the tracing subscriber from the loaded configuration. Call once
//! during startup, after `init_config()`.

use crate::config::get_config;

/// Initialize the tracing subscriber based on configuration
///
/// Uses `try_init` so repeated calls (e.g. from tests) are harmless; only
/// the first caller installs the subscriber.
pub fn init_logging() {
    let config = get_config();
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true);

    let result = if config.logging.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already initialized, skipping");
    }
}
