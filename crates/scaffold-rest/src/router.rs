//! Main application router.

use crate::{
    controllers::{health_controller, user_controller},
    middleware::logging_middleware,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, routing::get, Router};
use scaffold_config::ServerConfig;
use scaffold_core::{Logger, User};
use scaffold_repository::{Dao, DatabasePoolInterface, MySqlStore};
use shaku::{HasComponent, Module};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Creates the main application router from a Shaku module.
///
/// The module must provide the database pool and the logger; every Dao is
/// built on top of them.
pub fn create_router<M>(module: &M, server_config: &ServerConfig) -> Router
where
    M: Module + HasComponent<dyn DatabasePoolInterface> + HasComponent<dyn Logger>,
{
    let pool: Arc<dyn DatabasePoolInterface> = module.resolve();
    let logger: Arc<dyn Logger> = module.resolve();

    let users = Dao::new(Arc::new(MySqlStore::<User>::new(Arc::clone(&pool))), logger);

    let api_router = Router::new().nest("/users", user_controller::router(users));

    let router = build_router(api_router, AppState::new(pool), server_config);
    info!("Router created with REST endpoints under /api/v1");
    router
}

/// Mounts `api_router` under `/api/v1`, adds health routes, and applies
/// the middleware stack.
pub fn build_router(api_router: Router, state: AppState, server_config: &ServerConfig) -> Router {
    Router::new()
        // Health endpoints
        .merge(health_controller::router(state))
        // API v1
        .nest("/api/v1", api_router)
        // Root endpoint
        .route("/", get(root))
        // Add middleware layers
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server_config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }
    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "CRUD Scaffold API v1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_variants() {
        let mut config = ServerConfig {
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
            ..ServerConfig::default()
        };
        let _ = create_cors_layer(&config);

        config.cors_origins = vec!["https://example.com".to_string(), "bad\norigin".to_string()];
        let _ = create_cors_layer(&config);

        config.cors_enabled = false;
        let _ = create_cors_layer(&config);
    }
}
