//! Application state for routes outside the CRUD controllers.

use scaffold_repository::DatabasePoolInterface;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    /// Pool pinged by the readiness check; absent when running without a database.
    pub pool: Option<Arc<dyn DatabasePoolInterface>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool: Some(pool) }
    }
}
