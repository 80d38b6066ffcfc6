pub mod catalog;
pub mod config;
pub mod error;
pub mod geo;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod types;

use axum::Router;

use crate::state::AppState;

/// All API routes, without the outer layers added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::tracks::router())
        .merge(routes::library::router())
        .with_state(state)
}
