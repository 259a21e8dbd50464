//! Route modules for the Resource Viewer server

pub mod browser;
pub mod health;
pub mod loader;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Build the application router without middleware layers
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/browser", browser::router())
        .nest("/api/v1/loader", loader::router())
        .with_state(state)
}
