use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{charts, health};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/charts", charts::router())
        // Dashboard frontend is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
