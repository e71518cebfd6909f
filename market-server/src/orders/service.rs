//! Order lifecycle service
//!
//! Thin status mutations outside the assignment handoff: creation,
//! cancellation, and the payment-callback update. Every accepted mutation
//! is one committed transition (order + history) followed by a
//! best-effort notification.

use crate::notify::{notify_best_effort, NotificationSink};
use crate::orders::storage::{OrderStore, StorageError};
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AssignmentStatus, HistoryAction, NotificationType, Order, OrderCreate, OrderHistory,
    OrderItem, OrderStatus, SYSTEM_ACTOR,
};
use std::sync::Arc;

/// Order lifecycle operations over the store
#[derive(Clone)]
pub struct OrderService {
    store: OrderStore,
    notifier: Arc<dyn NotificationSink>,
}

impl OrderService {
    pub fn new(store: OrderStore, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { store, notifier }
    }

    /// Create an order with its line items
    ///
    /// The order starts `PENDING`/`UNASSIGNED`; the item batch is
    /// immutable afterwards.
    pub async fn create_order(&self, payload: OrderCreate) -> AppResult<Order> {
        if payload.items.is_empty() {
            return Err(AppError::validation("Order must contain at least one item")
                .with_detail("field", "items"));
        }
        for item in &payload.items {
            if item.quantity <= 0 {
                return Err(AppError::validation("Item quantity must be positive")
                    .with_detail("product_id", item.product_id));
            }
            if item.unit_price < Decimal::ZERO {
                return Err(AppError::validation("Item price must not be negative")
                    .with_detail("product_id", item.product_id));
            }
        }
        if payload.total_amount <= Decimal::ZERO {
            return Err(AppError::validation("Total amount must be positive")
                .with_detail("field", "total_amount"));
        }
        if payload.recipient_name.trim().is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Recipient name is required",
            ));
        }

        let now = shared::util::now_millis();
        let order = Order {
            id: shared::util::snowflake_id(),
            buyer_id: payload.buyer_id,
            shop_id: payload.shop_id,
            delivery_address_id: payload.delivery_address_id,
            total_amount: payload.total_amount,
            status: OrderStatus::Pending,
            assignment_status: AssignmentStatus::Unassigned,
            assigned_seller_id: None,
            assigned_shipper_id: None,
            voucher_id: payload.voucher_id,
            notes: payload.notes,
            recipient_name: payload.recipient_name,
            recipient_phone: payload.recipient_phone,
            delivery_address: payload.delivery_address,
            latitude: payload.latitude,
            longitude: payload.longitude,
            payment_reference: payload.payment_reference,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        let items: Vec<OrderItem> = payload
            .items
            .iter()
            .map(|i| OrderItem {
                order_id: order.id,
                product_id: i.product_id,
                quantity: i.quantity,
                unit_price: i.unit_price,
            })
            .collect();
        let entry = OrderHistory::new(
            order.id,
            None,
            OrderStatus::Pending,
            HistoryAction::OrderCreated,
            format!("Order placed with {} item(s)", items.len()),
            order.buyer_id.to_string(),
        );

        self.store
            .create_order(&order, &items, &entry)
            .map_err(storage_err)?;
        tracing::info!(order_id = order.id, buyer_id = order.buyer_id, "Order created");

        notify_best_effort(
            self.notifier.as_ref(),
            order.buyer_id,
            NotificationType::Order,
            "Order placed",
            &format!("Your order {} has been placed", order.id),
        )
        .await;

        Ok(order)
    }

    /// Get an order by id
    pub fn get_order(&self, order_id: i64) -> AppResult<Order> {
        self.store
            .get_order(order_id)
            .map_err(storage_err)?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::OrderNotFound,
                    format!("Order {} not found", order_id),
                )
            })
    }

    /// Get the line items of an order
    pub fn get_items(&self, order_id: i64) -> AppResult<Vec<OrderItem>> {
        // Existence check first so callers can distinguish "no such order"
        // from "order without items"
        self.get_order(order_id)?;
        self.store.get_items(order_id).map_err(storage_err)
    }

    pub fn list_by_buyer(&self, buyer_id: i64) -> AppResult<Vec<Order>> {
        self.store.find_by_buyer(buyer_id).map_err(storage_err)
    }

    pub fn list_by_shop(&self, shop_id: i64) -> AppResult<Vec<Order>> {
        self.store.find_by_shop(shop_id).map_err(storage_err)
    }

    pub fn list_by_status(&self, status: OrderStatus) -> AppResult<Vec<Order>> {
        self.store.find_by_status(status).map_err(storage_err)
    }

    /// Audit trail for an order, time-ascending
    pub fn history(&self, order_id: i64) -> AppResult<Vec<OrderHistory>> {
        self.get_order(order_id)?;
        self.store.history_for_order(order_id).map_err(storage_err)
    }

    /// Cancel an order
    ///
    /// Legal from `PENDING` or `CONFIRMED`; `CANCELLED` is terminal.
    pub async fn cancel(
        &self,
        order_id: i64,
        cancelled_by: &str,
        reason: Option<String>,
    ) -> AppResult<Order> {
        let order = self.get_order(order_id)?;
        if !order.status.can_transition_to(OrderStatus::Cancelled) {
            return Err(AppError::with_message(
                ErrorCode::InvalidTransition,
                format!("Order in status {} cannot be cancelled", order.status),
            ));
        }

        let mut updated = order.clone();
        updated.status = OrderStatus::Cancelled;
        let entry = OrderHistory::new(
            order_id,
            Some(order.status),
            OrderStatus::Cancelled,
            HistoryAction::OrderCancelled,
            reason.unwrap_or_else(|| "Order cancelled".to_string()),
            cancelled_by,
        );
        let committed = self
            .store
            .commit_transition(&updated, order.version, &entry)
            .map_err(storage_err)?;
        tracing::info!(order_id, cancelled_by, "Order cancelled");

        notify_best_effort(
            self.notifier.as_ref(),
            committed.buyer_id,
            NotificationType::Order,
            "Order cancelled",
            &format!("Order {} was cancelled", order_id),
        )
        .await;

        Ok(committed)
    }

    /// Idempotent status update keyed by an external payment reference
    ///
    /// Used by the payment-webhook collaborator. Setting a status the
    /// order already has reports success without writing a duplicate
    /// history entry.
    pub async fn update_status_by_payment_ref(
        &self,
        reference: &str,
        new_status: OrderStatus,
    ) -> AppResult<Order> {
        let order_id = self
            .store
            .order_id_for_payment_ref(reference)
            .map_err(storage_err)?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::PaymentRefUnknown,
                    format!("No order for payment reference {}", reference),
                )
            })?;
        let order = self.get_order(order_id)?;

        if order.status == new_status {
            tracing::debug!(order_id, status = %new_status, "Payment callback replay, no-op");
            return Ok(order);
        }
        if !order.status.can_transition_to(new_status) {
            return Err(AppError::with_message(
                ErrorCode::InvalidTransition,
                format!("Cannot move order from {} to {}", order.status, new_status),
            ));
        }

        let mut updated = order.clone();
        updated.status = new_status;
        let entry = OrderHistory::new(
            order_id,
            Some(order.status),
            new_status,
            HistoryAction::PaymentStatusUpdated,
            format!("Payment callback ({}) moved order to {}", reference, new_status),
            SYSTEM_ACTOR,
        );
        let committed = self
            .store
            .commit_transition(&updated, order.version, &entry)
            .map_err(storage_err)?;

        notify_best_effort(
            self.notifier.as_ref(),
            committed.buyer_id,
            NotificationType::Order,
            "Order updated",
            &format!("Order {} is now {}", order_id, new_status),
        )
        .await;

        Ok(committed)
    }
}

/// Map storage failures onto the shared error taxonomy
fn storage_err(err: StorageError) -> AppError {
    match err {
        StorageError::OrderNotFound(id) => {
            AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
        }
        StorageError::VersionConflict { order_id, .. } => AppError::with_message(
            ErrorCode::AssignmentConflict,
            format!("Order {} was modified concurrently", order_id),
        ),
        other => {
            tracing::error!(error = %other, "Storage error");
            AppError::database(other.to_string())
        }
    }
}
