use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/table", get(handlers::table))
        .route("/portions/step", post(handlers::step_portions))
        .route("/max", post(handlers::set_max))
        .route("/reset", post(handlers::reset))
        .route("/reorder", post(handlers::reorder))
        .route("/api/tracker", get(handlers::get_tracker))
        .route("/api/action", post(handlers::action))
        .route("/manifest.webmanifest", get(handlers::manifest))
        .with_state(state)
}
