//! Assignment API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::core::ServerState;
use shared::error::{AppError, AppResult};
use shared::models::{Order, UserRole};

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub user_id: i64,
    /// Acting user id, or "system"
    pub assigned_by: String,
}

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub user_id: i64,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListAssignedQuery {
    pub user_id: i64,
    pub role: UserRole,
}

/// Assign a seller to an order
pub async fn assign_seller(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignRequest>,
) -> AppResult<Json<Order>> {
    check_actor(&payload.assigned_by)?;
    let order = state
        .assignments
        .assign_seller(id, payload.user_id, &payload.assigned_by)
        .await?;
    Ok(Json(order))
}

/// Assign a shipper to an order
pub async fn assign_shipper(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignRequest>,
) -> AppResult<Json<Order>> {
    check_actor(&payload.assigned_by)?;
    let order = state
        .assignments
        .assign_shipper(id, payload.user_id, &payload.assigned_by)
        .await?;
    Ok(Json(order))
}

/// Best-effort auto-assignment of empty actor slots
pub async fn auto_assign(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.assignments.auto_assign(id).await?;
    Ok(Json(order))
}

/// Accept an assignment as the assigned actor
pub async fn accept(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<Order>> {
    let order = state.assignments.accept(id, payload.user_id).await?;
    Ok(Json(order))
}

/// Reject an assignment as the assigned actor
pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .assignments
        .reject(id, payload.user_id, payload.reason)
        .await?;
    Ok(Json(order))
}

/// Orders awaiting an answer from the given actor
pub async fn list_assigned(
    State(state): State<ServerState>,
    Query(query): Query<ListAssignedQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.assignments.list_assigned(query.user_id, query.role)?;
    Ok(Json(orders))
}

fn check_actor(assigned_by: &str) -> AppResult<()> {
    if assigned_by.trim().is_empty() {
        return Err(AppError::validation("assigned_by is required"));
    }
    Ok(())
}
