//! Assignment engine core

use super::error::{AssignmentError, AssignmentResult};
use super::strategy::AssignStrategy;
use crate::directory::UserDirectory;
use crate::notify::{notify_best_effort, NotificationSink};
use crate::orders::storage::OrderStore;
use shared::models::{
    AssignmentStatus, HistoryAction, NotificationType, Order, OrderHistory, OrderStatus, User,
    UserRole, SYSTEM_ACTOR,
};
use std::sync::Arc;

/// Orchestrates the seller/shipper handoff of an order
///
/// Loads and validates against the latest committed state, then commits
/// the mutated order together with its history entry in one unit of
/// work. The order's version token is checked inside that commit, so a
/// concurrent writer makes the losing call fail with
/// [`AssignmentError::Conflict`] instead of silently overwriting.
pub struct AssignmentEngine {
    store: OrderStore,
    directory: Arc<dyn UserDirectory>,
    notifier: Arc<dyn NotificationSink>,
    strategy: Arc<dyn AssignStrategy>,
}

impl AssignmentEngine {
    pub fn new(
        store: OrderStore,
        directory: Arc<dyn UserDirectory>,
        notifier: Arc<dyn NotificationSink>,
        strategy: Arc<dyn AssignStrategy>,
    ) -> Self {
        Self {
            store,
            directory,
            notifier,
            strategy,
        }
    }

    /// Assign a seller to an order
    ///
    /// Sets `assignedSellerId` and moves the handoff to `ASSIGNED`
    /// without touching the fulfillment status.
    pub async fn assign_seller(
        &self,
        order_id: i64,
        seller_id: i64,
        assigned_by: &str,
    ) -> AssignmentResult<Order> {
        let order = self.load_order(order_id)?;
        self.check_assignable(&order, UserRole::Seller)?;
        let seller = self.load_actor(seller_id, UserRole::Seller).await?;

        let mut updated = order.clone();
        updated.assigned_seller_id = Some(seller.id);
        updated.assignment_status = AssignmentStatus::Assigned;
        let entry = OrderHistory::new(
            order_id,
            Some(order.status),
            order.status,
            HistoryAction::OrderAssignedToSeller,
            format!("Seller {} assigned", seller.id),
            assigned_by,
        );
        let committed = self.store.commit_transition(&updated, order.version, &entry)?;
        tracing::info!(order_id, seller_id, assigned_by, "Seller assigned");

        notify_best_effort(
            self.notifier.as_ref(),
            seller.id,
            NotificationType::Order,
            "New order assigned",
            &format!("Order {} has been assigned to you", order_id),
        )
        .await;

        Ok(committed)
    }

    /// Assign a shipper to an order
    pub async fn assign_shipper(
        &self,
        order_id: i64,
        shipper_id: i64,
        assigned_by: &str,
    ) -> AssignmentResult<Order> {
        let order = self.load_order(order_id)?;
        self.check_assignable(&order, UserRole::Shipper)?;
        let shipper = self.load_actor(shipper_id, UserRole::Shipper).await?;

        let mut updated = order.clone();
        updated.assigned_shipper_id = Some(shipper.id);
        updated.assignment_status = AssignmentStatus::Assigned;
        let entry = OrderHistory::new(
            order_id,
            Some(order.status),
            order.status,
            HistoryAction::OrderAssignedToShipper,
            format!("Shipper {} assigned", shipper.id),
            assigned_by,
        );
        let committed = self.store.commit_transition(&updated, order.version, &entry)?;
        tracing::info!(order_id, shipper_id, assigned_by, "Shipper assigned");

        notify_best_effort(
            self.notifier.as_ref(),
            shipper.id,
            NotificationType::Delivery,
            "Delivery assigned",
            &format!("Order {} is ready for pickup", order_id),
        )
        .await;

        Ok(committed)
    }

    /// Accept an assignment
    ///
    /// Only the currently assigned actor may accept. A seller accepting
    /// moves the order to `CONFIRMED`, a shipper to `SHIPPING`.
    pub async fn accept(&self, order_id: i64, user_id: i64) -> AssignmentResult<Order> {
        let order = self.load_order(order_id)?;
        let role = self.answering_role(&order, user_id)?;

        let (next_status, action) = match role {
            UserRole::Seller => (OrderStatus::Confirmed, HistoryAction::OrderAcceptedBySeller),
            _ => (OrderStatus::Shipping, HistoryAction::OrderAcceptedByShipper),
        };
        if !order.status.can_transition_to(next_status) {
            // the actor's own stage already went through
            if order.assignment_status == AssignmentStatus::Accepted {
                return Err(AssignmentError::AlreadyAccepted(order_id));
            }
            return Err(AssignmentError::InvalidTransition(format!(
                "Cannot move order {} from {} to {}",
                order_id, order.status, next_status
            )));
        }

        let mut updated = order.clone();
        updated.status = next_status;
        updated.assignment_status = AssignmentStatus::Accepted;
        let entry = OrderHistory::new(
            order_id,
            Some(order.status),
            next_status,
            action,
            format!("{} {} accepted the order", role, user_id),
            user_id.to_string(),
        );
        let committed = self.store.commit_transition(&updated, order.version, &entry)?;
        tracing::info!(order_id, user_id, role = %role, "Assignment accepted");

        notify_best_effort(
            self.notifier.as_ref(),
            committed.buyer_id,
            NotificationType::Order,
            "Order updated",
            &format!("Order {} is now {}", order_id, next_status),
        )
        .await;

        Ok(committed)
    }

    /// Reject an assignment
    ///
    /// Clears the caller's assigned-id field and marks the handoff
    /// `REJECTED`; the fulfillment status is left unchanged. No
    /// automatic re-assignment happens here.
    pub async fn reject(
        &self,
        order_id: i64,
        user_id: i64,
        reason: Option<String>,
    ) -> AssignmentResult<Order> {
        let order = self.load_order(order_id)?;
        let role = self.answering_role(&order, user_id)?;

        // an actor whose stage already went through can no longer back out
        let stage_open = match role {
            UserRole::Seller => order.status == OrderStatus::Pending,
            _ => matches!(order.status, OrderStatus::Pending | OrderStatus::Confirmed),
        };
        if !stage_open {
            if order.assignment_status == AssignmentStatus::Accepted {
                return Err(AssignmentError::AlreadyAccepted(order_id));
            }
            return Err(AssignmentError::InvalidTransition(format!(
                "Order {} can no longer be rejected by its {}",
                order_id, role
            )));
        }

        let mut updated = order.clone();
        let action = match role {
            UserRole::Seller => {
                updated.assigned_seller_id = None;
                HistoryAction::OrderRejectedBySeller
            }
            _ => {
                updated.assigned_shipper_id = None;
                HistoryAction::OrderRejectedByShipper
            }
        };
        updated.assignment_status = AssignmentStatus::Rejected;
        let entry = OrderHistory::new(
            order_id,
            Some(order.status),
            order.status,
            action,
            reason.unwrap_or_else(|| format!("{} {} rejected the order", role, user_id)),
            user_id.to_string(),
        );
        let committed = self.store.commit_transition(&updated, order.version, &entry)?;
        tracing::info!(order_id, user_id, role = %role, "Assignment rejected");

        notify_best_effort(
            self.notifier.as_ref(),
            committed.buyer_id,
            NotificationType::Order,
            "Order needs attention",
            &format!("Order {} was declined by its {}", order_id, role),
        )
        .await;

        Ok(committed)
    }

    /// Best-effort auto-assignment
    ///
    /// Fills whichever of the two actor slots is empty using the
    /// configured strategy and records the transitions as `system`.
    /// Fails with [`AssignmentError::NoEligibleActor`] when a slot
    /// needed filling and no candidate was found.
    pub async fn auto_assign(&self, order_id: i64) -> AssignmentResult<Order> {
        let mut order = self.load_order(order_id)?;
        if order.status.is_terminal() {
            return Err(AssignmentError::Terminal(order_id));
        }

        let needs_seller = order.assigned_seller_id.is_none();
        let needs_shipper = order.assigned_shipper_id.is_none();
        let mut assigned_any = false;

        if needs_seller {
            if let Some(seller) = self
                .strategy
                .pick_seller(self.directory.as_ref(), &order)
                .await
                .map_err(|e| AssignmentError::Directory(e.to_string()))?
            {
                order = self.assign_seller(order_id, seller.id, SYSTEM_ACTOR).await?;
                assigned_any = true;
            }
        }
        if needs_shipper {
            if let Some(shipper) = self
                .strategy
                .pick_shipper(self.directory.as_ref(), &order)
                .await
                .map_err(|e| AssignmentError::Directory(e.to_string()))?
            {
                order = self.assign_shipper(order_id, shipper.id, SYSTEM_ACTOR).await?;
                assigned_any = true;
            }
        }

        if !assigned_any {
            if needs_seller {
                return Err(AssignmentError::NoEligibleActor(UserRole::Seller));
            }
            if needs_shipper {
                return Err(AssignmentError::NoEligibleActor(UserRole::Shipper));
            }
        }
        Ok(order)
    }

    /// Orders awaiting an answer from the given actor
    pub fn list_assigned(&self, user_id: i64, role: UserRole) -> AssignmentResult<Vec<Order>> {
        match role {
            UserRole::Seller | UserRole::Shipper => {
                Ok(self.store.find_assigned(user_id, role)?)
            }
            other => Err(AssignmentError::RoleMismatch {
                user_id,
                expected: UserRole::Seller,
                actual: other,
            }),
        }
    }

    fn load_order(&self, order_id: i64) -> AssignmentResult<Order> {
        self.store
            .get_order(order_id)?
            .ok_or(AssignmentError::OrderNotFound(order_id))
    }

    /// Look up an actor and require the given verified role
    async fn load_actor(&self, user_id: i64, role: UserRole) -> AssignmentResult<User> {
        let user = self
            .directory
            .find_by_id(user_id)
            .await
            .map_err(|e| AssignmentError::Directory(e.to_string()))?
            .ok_or(AssignmentError::UserNotFound(user_id))?;
        if user.role != role {
            return Err(AssignmentError::RoleMismatch {
                user_id,
                expected: role,
                actual: user.role,
            });
        }
        if !user.is_verified {
            return Err(AssignmentError::NotVerified(user_id));
        }
        Ok(user)
    }

    /// Gate an assign call against the order's current state
    ///
    /// Replacing an actor who already accepted is refused; a rejected or
    /// still-pending handoff may be (re-)assigned freely.
    fn check_assignable(&self, order: &Order, role: UserRole) -> AssignmentResult<()> {
        if order.status.is_terminal() {
            return Err(AssignmentError::Terminal(order.id));
        }
        if !order.assignment_status.allows_assignment() {
            let slot_taken = match role {
                UserRole::Seller => order.assigned_seller_id.is_some(),
                _ => order.assigned_shipper_id.is_some(),
            };
            if slot_taken {
                return Err(AssignmentError::AlreadyAccepted(order.id));
            }
        }
        Ok(())
    }

    /// Resolve which role the caller answers for
    ///
    /// Eligibility comes from the assigned-id fields; the handoff field
    /// only rules out orders with no live assignment. Whether the
    /// caller's own stage is still open is checked against the status
    /// machine by the caller.
    fn answering_role(&self, order: &Order, user_id: i64) -> AssignmentResult<UserRole> {
        match order.assignment_status {
            AssignmentStatus::Unassigned => Err(AssignmentError::NotAssigned(order.id)),
            AssignmentStatus::Rejected => Err(AssignmentError::InvalidTransition(format!(
                "Order {} assignment was rejected and must be re-assigned first",
                order.id
            ))),
            AssignmentStatus::Assigned | AssignmentStatus::Accepted => {
                if order.is_assigned_seller(user_id) {
                    Ok(UserRole::Seller)
                } else if order.is_assigned_shipper(user_id) {
                    Ok(UserRole::Shipper)
                } else {
                    Err(AssignmentError::PermissionDenied(format!(
                        "User {} is not the assigned actor for order {}",
                        user_id, order.id
                    )))
                }
            }
        }
    }
}
