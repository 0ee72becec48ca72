//! HTTP API module
//!
//! Exposes stream resolution and the manifest/caption proxy over axum.

pub mod error;
pub mod health;
pub mod proxy;
pub mod resolve;

use std::sync::Arc;

use axum::Router;
use streamgate_core::ResolutionService;
use streamgate_proxy::ManifestProxy;
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolution_service: Arc<ResolutionService>,
    pub proxy: Arc<dyn ManifestProxy>,
}

impl AppState {
    pub fn new(resolution_service: ResolutionService, proxy: impl ManifestProxy + 'static) -> Self {
        Self {
            resolution_service: Arc::new(resolution_service),
            proxy: Arc::new(proxy),
        }
    }
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::create_health_router())
        .merge(resolve::create_resolve_router())
        .merge(proxy::create_proxy_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
