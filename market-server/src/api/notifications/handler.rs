//! Notification API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::core::ServerState;
use shared::error::AppResult;
use shared::models::Notification;

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub count: usize,
}

/// Notifications for a user, newest first
pub async fn list_for_user(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Notification>>> {
    Ok(Json(state.notifications.list_for_user(user_id)?))
}

/// Unread notification count for a user
pub async fn unread_count(
    State(state): State<ServerState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UnreadCountResponse>> {
    let count = state.notifications.unread_count(user_id)?;
    Ok(Json(UnreadCountResponse { count }))
}

/// Mark one notification as read
pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<()>> {
    state.notifications.mark_read(id)?;
    Ok(Json(()))
}
