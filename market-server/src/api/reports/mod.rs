//! Reporting API module
//!
//! Read-only aggregation views, computed on demand.

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/status-counts", get(handler::status_counts))
        .route("/shops/{shop_id}/revenue", get(handler::shop_revenue))
        .route("/shops/{shop_id}/top-products", get(handler::top_products))
        .route("/customers/{buyer_id}/summary", get(handler::customer_summary))
}
