//! Server startup utilities.

use scaffold_config::LoggingConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when the configured directive does not parse.
const FALLBACK_FILTER: &str = "info";

/// Builds the log filter. `RUST_LOG` wins over the configured directive.
pub fn log_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Installs the global `tracing` subscriber.
pub fn init_logging(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(log_filter(config));

    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).init();
    }
}

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   ____ ____  _   _ ____    ____             __  __       _     _
  / ___|  _ \| | | |  _ \  / ___|  ___ __ _ / _|/ _| ___ | | __| |
 | |   | |_) | | | | | | | \___ \ / __/ _` | |_| |_ / _ \| |/ _` |
 | |___|  _ <| |_| | |_| |  ___) | (_| (_| |  _|  _| (_) | | (_| |
  \____|_| \_\\___/|____/  |____/ \___\__,_|_| |_|  \___/|_|\__,_|
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1", addr);
    info!("Health:    http://{}/health", addr);
    info!("{}", separator);
}
