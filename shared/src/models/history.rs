//! Order History Model
//!
//! Append-only audit trail: one entry per accepted transition, never
//! updated or deleted.

use super::order::OrderStatus;
use serde::{Deserialize, Serialize};

/// `created_by` value for transitions applied without a human actor
pub const SYSTEM_ACTOR: &str = "system";

/// Tag naming the transition an entry records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    OrderCreated,
    OrderAssignedToSeller,
    OrderAssignedToShipper,
    OrderAcceptedBySeller,
    OrderAcceptedByShipper,
    OrderRejectedBySeller,
    OrderRejectedByShipper,
    OrderCancelled,
    PaymentStatusUpdated,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order_created",
            Self::OrderAssignedToSeller => "order_assigned_to_seller",
            Self::OrderAssignedToShipper => "order_assigned_to_shipper",
            Self::OrderAcceptedBySeller => "order_accepted_by_seller",
            Self::OrderAcceptedByShipper => "order_accepted_by_shipper",
            Self::OrderRejectedBySeller => "order_rejected_by_seller",
            Self::OrderRejectedByShipper => "order_rejected_by_shipper",
            Self::OrderCancelled => "order_cancelled",
            Self::PaymentStatusUpdated => "payment_status_updated",
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistory {
    pub id: i64,
    pub order_id: i64,
    /// None for the creation entry
    pub status_from: Option<OrderStatus>,
    pub status_to: OrderStatus,
    pub action: HistoryAction,
    pub description: String,
    /// User id as text, or [`SYSTEM_ACTOR`]
    pub created_by: String,
    pub created_at: i64,
}

impl OrderHistory {
    pub fn new(
        order_id: i64,
        status_from: Option<OrderStatus>,
        status_to: OrderStatus,
        action: HistoryAction,
        description: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::util::snowflake_id(),
            order_id,
            status_from,
            status_to,
            action,
            description: description.into(),
            created_by: created_by.into(),
            created_at: crate::util::now_millis(),
        }
    }
}
