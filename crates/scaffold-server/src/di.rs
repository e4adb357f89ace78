//! Dependency injection module using Shaku.
//!
//! `AppModule` provides the shared database pool and the injected logger.
//! Every Dao the router builds resolves both from here.

use scaffold_config::DatabaseConfig;
use scaffold_core::{ScaffoldResult, TracingLogger};
use scaffold_repository::{DatabasePool, DatabasePoolInterface, DatabasePoolParameters};
use shaku::module;
use sqlx::MySqlPool;
use std::sync::Arc;

module! {
    pub AppModule {
        components = [
            DatabasePool,
            TracingLogger,
        ],
        providers = [],
    }
}

/// Connects to the database and builds the module around the new pool.
pub async fn build_app_module(db_config: &DatabaseConfig) -> ScaffoldResult<Arc<AppModule>> {
    let db_pool = DatabasePool::new(db_config).await?;
    Ok(Arc::new(app_module_with_pool(db_pool.inner().clone())))
}

/// Builds the module around an existing pool.
#[must_use]
pub fn app_module_with_pool(pool: MySqlPool) -> AppModule {
    AppModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters { pool })
        .build()
}
