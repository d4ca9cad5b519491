use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .load_full()
}

/// Initialize the global configuration
///
/// Loads `.env` (if present), then `config.toml` from the current directory
/// layered with `BLOGSTATS_*` environment variables. Missing sources fall
/// back to in-memory defaults. Safe to call more than once; only the first
/// call loads.
pub fn init_config() {
    CONFIG.get_or_init(|| {
        dotenvy::dotenv().ok();
        ArcSwap::from_pointee(StaticConfig::load())
    });
}
