use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Install the global fmt subscriber. `RUST_LOG` wins over the preset filter.
pub fn init(config: &AppConfig) {
    let default_filter = if config.is_production() {
        "info"
    } else {
        "collapp_api=debug,tower_http=debug,info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (tests, embedded use) is harmless
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
