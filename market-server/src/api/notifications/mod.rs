//! Notification API module

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/notifications", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/user/{user_id}", get(handler::list_for_user))
        .route("/user/{user_id}/unread-count", get(handler::unread_count))
        .route("/{id}/read", post(handler::mark_read))
}
