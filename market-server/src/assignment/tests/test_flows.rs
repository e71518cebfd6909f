use super::*;

#[tokio::test]
async fn test_assign_seller_sets_handoff_without_touching_status() {
    let env = test_env();

    let order = env.engine.assign_seller(1, 7, "admin-1").await.unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.assignment_status, AssignmentStatus::Assigned);
    assert_eq!(order.assigned_seller_id, Some(7));
    assert_eq!(order.version, 1);

    let history = env.store.history_for_order(1).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].action, HistoryAction::OrderAssignedToSeller);
    assert_eq!(history[1].created_by, "admin-1");
    // status unchanged, both sides of the entry agree
    assert_eq!(history[1].status_from, Some(OrderStatus::Pending));
    assert_eq!(history[1].status_to, OrderStatus::Pending);
}

#[tokio::test]
async fn test_seller_accept_confirms_order() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();

    let order = env.engine.accept(1, 7).await.unwrap();

    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.assignment_status, AssignmentStatus::Accepted);

    let history = env.store.history_for_order(1).unwrap();
    let last = history.last().unwrap();
    assert_eq!(last.action, HistoryAction::OrderAcceptedBySeller);
    assert_eq!(last.status_from, Some(OrderStatus::Pending));
    assert_eq!(last.status_to, OrderStatus::Confirmed);
    assert_eq!(last.created_by, "7");
}

#[tokio::test]
async fn test_full_handoff_through_shipping() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();
    env.engine.accept(1, 7).await.unwrap();
    env.engine.assign_shipper(1, 8, "admin-1").await.unwrap();

    let order = env.engine.accept(1, 8).await.unwrap();

    assert_eq!(order.status, OrderStatus::Shipping);
    assert_eq!(order.assignment_status, AssignmentStatus::Accepted);
    assert_eq!(order.assigned_seller_id, Some(7));
    assert_eq!(order.assigned_shipper_id, Some(8));

    let actions: Vec<HistoryAction> = env
        .store
        .history_for_order(1)
        .unwrap()
        .iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            HistoryAction::OrderCreated,
            HistoryAction::OrderAssignedToSeller,
            HistoryAction::OrderAcceptedBySeller,
            HistoryAction::OrderAssignedToShipper,
            HistoryAction::OrderAcceptedByShipper,
        ]
    );
}

#[tokio::test]
async fn test_accept_notifies_buyer() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();
    assert_eq!(env.sink.sent_to(7), 1);

    env.engine.accept(1, 7).await.unwrap();
    assert_eq!(env.sink.sent_to(100), 1);
}

#[tokio::test]
async fn test_auto_assign_picks_first_verified_actors() {
    let env = test_env();

    let order = env.engine.auto_assign(1).await.unwrap();

    // seller 10 is unverified so 7 is the first candidate
    assert_eq!(order.assigned_seller_id, Some(7));
    assert_eq!(order.assigned_shipper_id, Some(8));
    assert_eq!(order.assignment_status, AssignmentStatus::Assigned);

    let history = env.store.history_for_order(1).unwrap();
    assert!(history
        .iter()
        .filter(|e| e.action == HistoryAction::OrderAssignedToSeller)
        .all(|e| e.created_by == "system"));
}

#[tokio::test]
async fn test_auto_assign_skips_filled_slot() {
    let env = test_env();
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();

    let order = env.engine.auto_assign(1).await.unwrap();

    assert_eq!(order.assigned_seller_id, Some(7));
    assert_eq!(order.assigned_shipper_id, Some(8));
    // only one seller-assignment entry in the trail
    let seller_assigns = env
        .store
        .history_for_order(1)
        .unwrap()
        .iter()
        .filter(|e| e.action == HistoryAction::OrderAssignedToSeller)
        .count();
    assert_eq!(seller_assigns, 1);
}

#[tokio::test]
async fn test_list_assigned_filters_by_actor_and_role() {
    let env = test_env();
    seed_order(&env.store, 2);
    env.engine.assign_seller(1, 7, "admin-1").await.unwrap();
    env.engine.assign_shipper(2, 8, "admin-1").await.unwrap();

    let seller_orders = env.engine.list_assigned(7, UserRole::Seller).unwrap();
    assert_eq!(seller_orders.len(), 1);
    assert_eq!(seller_orders[0].id, 1);

    let shipper_orders = env.engine.list_assigned(8, UserRole::Shipper).unwrap();
    assert_eq!(shipper_orders.len(), 1);
    assert_eq!(shipper_orders[0].id, 2);

    // an accepted order drops off the pending list
    env.engine.accept(1, 7).await.unwrap();
    assert!(env.engine.list_assigned(7, UserRole::Seller).unwrap().is_empty());
}
