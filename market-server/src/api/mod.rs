//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`orders`] - order lifecycle (create, query, cancel, payment callback)
//! - [`assignments`] - seller/shipper handoff operations
//! - [`notifications`] - per-user notification feed
//! - [`reports`] - read-only aggregation views

pub mod assignments;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod reports;

use crate::core::ServerState;
use axum::Router;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(assignments::router())
        .merge(notifications::router())
        .merge(reports::router())
}
