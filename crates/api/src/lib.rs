//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The single operation endpoint (POST `/`)
//! - The health check endpoint
//! - Response serialization for ledger results and rejections

pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use kasse_core::ledger::LedgerService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The ledger all operations run against.
    pub ledger: Arc<LedgerService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
