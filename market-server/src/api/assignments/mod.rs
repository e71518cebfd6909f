//! Assignment API module
//!
//! Seller/shipper handoff operations on an order, plus the per-actor
//! pending-assignment list. Acting users are always explicit request
//! fields, never ambient context.

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/orders", order_routes())
        .nest("/api/assignments", assignment_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/assign/seller", post(handler::assign_seller))
        .route("/{id}/assign/shipper", post(handler::assign_shipper))
        .route("/{id}/assign/auto", post(handler::auto_assign))
        .route("/{id}/accept", post(handler::accept))
        .route("/{id}/reject", post(handler::reject))
}

fn assignment_routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list_assigned))
}
