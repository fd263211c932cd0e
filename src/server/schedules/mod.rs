mod availabilities;
mod comments;
mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn schedules_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/schedules", post(handlers::create_schedule))
        .route("/schedules/new", get(handlers::new_schedule_form))
        .route("/schedules/{id}", get(handlers::show_schedule))
        .route("/schedules/{id}", post(handlers::update_schedule))
        .route("/schedules/{id}/edit", get(handlers::edit_schedule_form))
        // Per-cell writes
        .route(
            "/schedules/{id}/users/{user_id}/candidates/{candidate_id}",
            post(availabilities::update_availability),
        )
        .route(
            "/schedules/{id}/users/{user_id}/comments",
            post(comments::update_comment),
        )
}
