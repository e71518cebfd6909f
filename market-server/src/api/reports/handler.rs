//! Reporting API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::reports::{CustomerSummary, ProductSales, RevenueReport, StatusCounts};
use shared::error::AppResult;

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    /// Window start (epoch milliseconds, inclusive), default unbounded
    #[serde(default)]
    pub from: i64,
    /// Window end (epoch milliseconds, exclusive), default unbounded
    #[serde(default = "default_to")]
    pub to: i64,
}

fn default_to() -> i64 {
    i64::MAX
}

#[derive(Debug, Deserialize)]
pub struct TopProductsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// Revenue of a shop over a time window, cancelled orders excluded
pub async fn shop_revenue(
    State(state): State<ServerState>,
    Path(shop_id): Path<i64>,
    Query(query): Query<RevenueQuery>,
) -> AppResult<Json<RevenueReport>> {
    Ok(Json(state.reports.shop_revenue(shop_id, query.from, query.to)?))
}

/// Order counts per fulfillment status
pub async fn status_counts(State(state): State<ServerState>) -> AppResult<Json<StatusCounts>> {
    Ok(Json(state.reports.status_counts()?))
}

/// Rollup of one buyer's order history
pub async fn customer_summary(
    State(state): State<ServerState>,
    Path(buyer_id): Path<i64>,
) -> AppResult<Json<CustomerSummary>> {
    Ok(Json(state.reports.customer_summary(buyer_id)?))
}

/// Best-selling products of a shop
pub async fn top_products(
    State(state): State<ServerState>,
    Path(shop_id): Path<i64>,
    Query(query): Query<TopProductsQuery>,
) -> AppResult<Json<Vec<ProductSales>>> {
    Ok(Json(
        state.reports.top_products(shop_id, query.limit).await?,
    ))
}
