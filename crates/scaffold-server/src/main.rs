//! CRUD Scaffold Server
//!
//! Loads configuration, connects to MySQL, and serves the REST API until
//! Ctrl+C or SIGTERM.

use scaffold_config::{validate_config, AppConfig, ConfigLoader};
use scaffold_core::{ScaffoldError, ScaffoldResult};
use scaffold_repository::DatabasePoolInterface;
use scaffold_rest::create_router;
use scaffold_server::{di, startup};
use shaku::HasComponent;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    startup::init_logging(&config.logging);
    startup::print_banner();

    info!("Starting CRUD Scaffold Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn load_config() -> ScaffoldResult<AppConfig> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get();
    validate_config(&config)?;
    Ok(config)
}

async fn run(config: AppConfig) -> ScaffoldResult<()> {
    info!("Environment: {}", config.app.environment);

    // Build DI module around the connection pool
    let module = di::build_app_module(&config.database).await?;
    let pool: Arc<dyn DatabasePoolInterface> = module.resolve();

    if config.database.run_migrations {
        pool.run_migrations().await?;
    }

    let router = create_router(&*module, &config.server);

    let addr = config.server.addr();
    startup::print_startup_info(&addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ScaffoldError::Internal(format!("Failed to bind REST: {}", e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ScaffoldError::Internal(format!("REST server error: {}", e)))?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
