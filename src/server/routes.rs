//! Route table

use axum::routing::{get, post};
use axum::Router;

use super::handlers;
use super::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/polls",
            get(handlers::list_polls).post(handlers::create_poll),
        )
        .route(
            "/api/polls/{id}",
            get(handlers::get_poll).delete(handlers::delete_poll),
        )
        .route("/api/polls/{id}/vote", post(handlers::vote))
        .route("/events/{id}", get(handlers::events))
        .with_state(state)
}
