//! Order API module
//!
//! Creation, queries, cancellation and the payment callback. The
//! seller/shipper handoff lives in [`crate::api::assignments`].

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        // Payment collaborator callback, keyed by external reference
        .route("/payment-callback", post(handler::payment_callback))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", get(handler::get_items))
        .route("/{id}/history", get(handler::get_history))
        .route("/{id}/cancel", post(handler::cancel))
}
