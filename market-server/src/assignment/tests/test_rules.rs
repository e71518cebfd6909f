use super::*;

fn order_snapshot(env: &TestEnv, order_id: i64) -> (Order, usize) {
    let order = env.store.get_order(order_id).unwrap().unwrap();
    let entries = env.store.history_for_order(order_id).unwrap().len();
    (order, entries)
}

#[tokio::test]
async fn test_accept_by_stranger_is_permission_denied() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();
    let (before, entries_before) = order_snapshot(&env, 1);

    let err = env.engine.accept(1, 9).await.unwrap_err();
    assert!(matches!(err, AssignmentError::PermissionDenied(_)));

    // rejected call leaves durable state untouched
    let (after, entries_after) = order_snapshot(&env, 1);
    assert_eq!(after.status, before.status);
    assert_eq!(after.assignment_status, before.assignment_status);
    assert_eq!(after.version, before.version);
    assert_eq!(entries_after, entries_before);
}

#[tokio::test]
async fn test_shipper_cannot_answer_for_the_seller() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();

    let err = env.engine.accept(1, 8).await.unwrap_err();
    assert!(matches!(err, AssignmentError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_accept_unassigned_order_fails() {
    let env = test_env();

    let err = env.engine.accept(1, 7).await.unwrap_err();
    assert!(matches!(err, AssignmentError::NotAssigned(1)));
}

#[tokio::test]
async fn test_accept_twice_fails() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();
    env.engine.accept(1, 7).await.unwrap();

    let err = env.engine.accept(1, 7).await.unwrap_err();
    assert!(matches!(err, AssignmentError::AlreadyAccepted(1)));
}

#[tokio::test]
async fn test_reject_clears_assignment_and_keeps_status() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();

    let order = env
        .engine
        .reject(1, 7, Some("Out of stock".to_string()))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.assignment_status, AssignmentStatus::Rejected);
    assert_eq!(order.assigned_seller_id, None);

    let history = env.store.history_for_order(1).unwrap();
    let last = history.last().unwrap();
    assert_eq!(last.action, HistoryAction::OrderRejectedBySeller);
    assert_eq!(last.description, "Out of stock");
    assert_eq!(last.status_to, OrderStatus::Pending);
}

#[tokio::test]
async fn test_rejected_order_can_be_reassigned() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();
    env.engine.reject(1, 7, None).await.unwrap();

    let order = env.engine.assign_seller(1, 7, "admin-1").await.unwrap();
    assert_eq!(order.assignment_status, AssignmentStatus::Assigned);
    assert_eq!(order.assigned_seller_id, Some(7));
}

#[tokio::test]
async fn test_reassigning_an_accepted_actor_fails() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();
    env.engine.accept(1, 7).await.unwrap();

    let err = env.engine.assign_seller(1, 7, "admin-1").await.unwrap_err();
    assert!(matches!(err, AssignmentError::AlreadyAccepted(1)));
}

#[tokio::test]
async fn test_role_mismatch_on_assign() {
    let env = test_env();

    // shipper 8 offered for the seller slot
    let err = env.engine.assign_seller(1, 8, "admin-1").await.unwrap_err();
    assert!(matches!(
        err,
        AssignmentError::RoleMismatch {
            user_id: 8,
            expected: UserRole::Seller,
            actual: UserRole::Shipper,
        }
    ));
}

#[tokio::test]
async fn test_unverified_actor_is_refused() {
    let env = test_env();

    let err = env.engine.assign_seller(1, 10, "admin-1").await.unwrap_err();
    assert!(matches!(err, AssignmentError::NotVerified(10)));
}

#[tokio::test]
async fn test_shipper_accept_requires_confirmed_order() {
    let env = test_env();
    env.engine.assign_shipper(1, 8, "admin-1").await.unwrap();

    // order is still pending, shipping is not reachable yet
    let err = env.engine.accept(1, 8).await.unwrap_err();
    assert!(matches!(err, AssignmentError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_list_assigned_rejects_non_actor_roles() {
    let env = test_env();

    let err = env.engine.list_assigned(9, UserRole::Buyer).unwrap_err();
    assert!(matches!(err, AssignmentError::RoleMismatch { .. }));
}
