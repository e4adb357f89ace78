//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use scaffold_core::ScaffoldError;
use std::path::Path;
use tracing::{debug, info, warn};

/// Environment variable selecting the `config/{environment}.toml` layer.
pub const ENVIRONMENT_VAR: &str = "SCAFFOLD_ENVIRONMENT";

/// Prefix for overriding environment variables (`SCAFFOLD__SERVER__PORT`).
pub const ENV_PREFIX: &str = "SCAFFOLD";

/// Configuration loader with layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `SCAFFOLD__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, ScaffoldError> {
        let config = Self::load_config(&config_dir.into())?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, ScaffoldError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, ScaffoldError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for layer in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, layer);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_scaffold_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_scaffold_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }
}

/// Rejects configurations the server cannot start with.
pub fn validate_config(config: &AppConfig) -> Result<(), ScaffoldError> {
    if config.database.url.is_empty() {
        return Err(ScaffoldError::Configuration("Database URL is required".to_string()));
    }

    let url = url::Url::parse(&config.database.url)
        .map_err(|e| ScaffoldError::Configuration(format!("Invalid database URL: {}", e)))?;
    if url.scheme() != "mysql" {
        return Err(ScaffoldError::Configuration(format!(
            "Unsupported database scheme '{}', expected 'mysql'",
            url.scheme()
        )));
    }

    if config.database.max_connections == 0 {
        return Err(ScaffoldError::Configuration(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if config.database.min_connections > config.database.max_connections {
        warn!(
            "database.min_connections ({}) exceeds max_connections ({})",
            config.database.min_connections, config.database.max_connections
        );
    }

    Ok(())
}

fn config_error_to_scaffold_error(err: ConfigError) -> ScaffoldError {
    ScaffoldError::Configuration(err.to_string())
}
