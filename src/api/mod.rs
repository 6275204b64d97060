//! API HTTP (axum).

pub mod auth;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use auth::{Caller, IdentityResolver, TokenIdentityResolver};
pub use state::{build_state, AppState};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new().route("/health", get(routes::health_check))
                 .route("/api/documentation/generate", post(routes::documentation::generate))
                 .route("/api/documentation", get(routes::documentation::list))
                 .route("/api/documentation/:documentation_type", get(routes::documentation::get_one))
                 .route("/api/documentation/:documentation_type/versions", get(routes::documentation::versions))
                 .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                 .layer(TraceLayer::new_for_http())
                 .with_state(state)
}
