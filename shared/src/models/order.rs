//! Order Model
//!
//! The order carries two independent state axes:
//!
//! - [`OrderStatus`]: the buyer-facing fulfillment stage
//!   (`PENDING -> CONFIRMED -> SHIPPING -> DELIVERED`, with `CANCELLED`
//!   reachable from `PENDING`/`CONFIRMED`).
//! - [`AssignmentStatus`]: the seller/shipper handoff stage
//!   (`UNASSIGNED -> ASSIGNED -> ACCEPTED`, or `ASSIGNED -> REJECTED`).
//!
//! Legality of a transition is decided here, once, so callers never
//! compare raw strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Buyer-facing fulfillment stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipping,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, Shipping)
                | (Shipping, Delivered)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Shipping => "SHIPPING",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seller/shipper handoff stage, independent of [`OrderStatus`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    #[default]
    Unassigned,
    Assigned,
    Accepted,
    Rejected,
}

impl AssignmentStatus {
    /// Whether a new assignment may be made in this state
    ///
    /// Re-assigning an accepted order is not allowed; a rejected or
    /// never-answered assignment may be replaced.
    pub fn allows_assignment(&self) -> bool {
        !matches!(self, Self::Accepted)
    }
}

/// Order entity
///
/// Owned by the order store; mutated only through committed transitions
/// that bump `version` (optimistic concurrency token).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub buyer_id: i64,
    pub shop_id: i64,
    pub delivery_address_id: i64,
    /// Total amount in currency units
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub assignment_status: AssignmentStatus,
    pub assigned_seller_id: Option<i64>,
    pub assigned_shipper_id: Option<i64>,
    pub voucher_id: Option<i64>,
    pub notes: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub delivery_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// External payment reference (set by the payment collaborator)
    pub payment_reference: Option<String>,
    /// Bumped on every committed transition; writes must carry the value read
    pub version: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Whether `user_id` is the currently assigned seller
    pub fn is_assigned_seller(&self, user_id: i64) -> bool {
        self.assigned_seller_id == Some(user_id)
    }

    /// Whether `user_id` is the currently assigned shipper
    pub fn is_assigned_shipper(&self, user_id: i64) -> bool {
        self.assigned_shipper_id == Some(user_id)
    }
}

/// Order line item
///
/// Created as a batch at order-creation time, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    /// Unit price in currency units
    pub unit_price: Decimal,
}

impl OrderItem {
    /// Quantity times unit price
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Line item input at order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub buyer_id: i64,
    pub shop_id: i64,
    pub delivery_address_id: i64,
    pub items: Vec<OrderItemInput>,
    pub total_amount: Decimal,
    pub voucher_id: Option<i64>,
    pub notes: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub delivery_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub payment_reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Shipping));
        assert!(Shipping.can_transition_to(Delivered));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
    }

    #[test]
    fn test_illegal_transitions() {
        use OrderStatus::*;
        assert!(!Pending.can_transition_to(Shipping));
        assert!(!Shipping.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Shipping.is_terminal());
    }

    #[test]
    fn test_assignment_allows() {
        assert!(AssignmentStatus::Unassigned.allows_assignment());
        assert!(AssignmentStatus::Assigned.allows_assignment());
        assert!(AssignmentStatus::Rejected.allows_assignment());
        assert!(!AssignmentStatus::Accepted.allows_assignment());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Shipping).unwrap();
        assert_eq!(json, "\"SHIPPING\"");
        let status: AssignmentStatus = serde_json::from_str("\"UNASSIGNED\"").unwrap();
        assert_eq!(status, AssignmentStatus::Unassigned);
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            order_id: 1,
            product_id: 2,
            quantity: 3,
            unit_price: Decimal::new(50000, 0),
        };
        assert_eq!(item.line_total(), Decimal::new(150000, 0));
    }
}
