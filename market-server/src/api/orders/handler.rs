//! Order API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use shared::error::{AppError, AppResult};
use shared::models::{Order, OrderCreate, OrderHistory, OrderItem, OrderItemInput, OrderStatus};

/// Create order request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub buyer_id: i64,
    pub shop_id: i64,
    pub delivery_address_id: i64,
    #[validate(length(min = 1, message = "Order must contain at least one item"))]
    pub items: Vec<OrderItemInput>,
    pub total_amount: Decimal,
    pub voucher_id: Option<i64>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "Recipient name is required"))]
    pub recipient_name: String,
    #[validate(length(min = 1, message = "Recipient phone is required"))]
    pub recipient_phone: String,
    #[validate(length(min = 1, message = "Delivery address is required"))]
    pub delivery_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub payment_reference: Option<String>,
}

impl From<CreateOrderRequest> for OrderCreate {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            buyer_id: req.buyer_id,
            shop_id: req.shop_id,
            delivery_address_id: req.delivery_address_id,
            items: req.items,
            total_amount: req.total_amount,
            voucher_id: req.voucher_id,
            notes: req.notes,
            recipient_name: req.recipient_name,
            recipient_phone: req.recipient_phone,
            delivery_address: req.delivery_address,
            latitude: req.latitude,
            longitude: req.longitude,
            payment_reference: req.payment_reference,
        }
    }
}

/// Query params for listing orders, exactly one filter required
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub buyer_id: Option<i64>,
    pub shop_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    /// Acting user id, or "system"
    pub cancelled_by: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentCallbackRequest {
    pub reference: String,
    pub status: OrderStatus,
}

/// Create an order with its line items
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let order = state.orders.create_order(payload.into()).await?;
    Ok(Json(order))
}

/// List orders by buyer, shop, or status
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = match (query.buyer_id, query.shop_id, query.status) {
        (Some(buyer_id), None, None) => state.orders.list_by_buyer(buyer_id)?,
        (None, Some(shop_id), None) => state.orders.list_by_shop(shop_id)?,
        (None, None, Some(status)) => state.orders.list_by_status(status)?,
        _ => {
            return Err(AppError::validation(
                "Provide exactly one of buyer_id, shop_id, status",
            ))
        }
    };
    Ok(Json(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get_order(id)?))
}

/// Get the line items of an order
pub async fn get_items(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OrderItem>>> {
    Ok(Json(state.orders.get_items(id)?))
}

/// Audit trail of an order, time-ascending
pub async fn get_history(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<OrderHistory>>> {
    Ok(Json(state.orders.history(id)?))
}

/// Cancel an order
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<Order>> {
    if payload.cancelled_by.trim().is_empty() {
        return Err(AppError::validation("cancelled_by is required"));
    }
    let order = state
        .orders
        .cancel(id, &payload.cancelled_by, payload.reason)
        .await?;
    Ok(Json(order))
}

/// Payment callback keyed by external reference
pub async fn payment_callback(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentCallbackRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .update_status_by_payment_ref(&payload.reference, payload.status)
        .await?;
    Ok(Json(order))
}
