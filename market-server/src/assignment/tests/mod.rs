use super::*;
use crate::directory::InMemoryDirectory;
use crate::notify::NotificationSink;
use crate::orders::storage::OrderStore;
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AssignmentStatus, HistoryAction, NotificationType, Order, OrderHistory, OrderItem,
    OrderStatus, User, UserRole,
};
use std::sync::{Arc, Mutex};

mod test_flows;
mod test_rules;

/// Sink that records every delivery
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingSink {
    fn sent_to(&self, user_id: i64) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == user_id)
            .count()
    }
}

#[async_trait::async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(
        &self,
        user_id: i64,
        _kind: NotificationType,
        title: &str,
        _body: &str,
    ) -> AppResult<()> {
        self.sent.lock().unwrap().push((user_id, title.to_string()));
        Ok(())
    }
}

/// Sink that always fails
struct FailingSink;

#[async_trait::async_trait]
impl NotificationSink for FailingSink {
    async fn notify(
        &self,
        _user_id: i64,
        _kind: NotificationType,
        _title: &str,
        _body: &str,
    ) -> AppResult<()> {
        Err(AppError::new(ErrorCode::NotificationFailed))
    }
}

fn test_user(id: i64, role: UserRole, verified: bool) -> User {
    User {
        id,
        name: format!("user-{}", id),
        role,
        is_verified: verified,
    }
}

fn test_order(id: i64) -> Order {
    let now = shared::util::now_millis();
    Order {
        id,
        buyer_id: 100,
        shop_id: 1,
        delivery_address_id: 1,
        total_amount: Decimal::from(150000),
        status: OrderStatus::Pending,
        assignment_status: AssignmentStatus::Unassigned,
        assigned_seller_id: None,
        assigned_shipper_id: None,
        voucher_id: None,
        notes: None,
        recipient_name: "Test Buyer".to_string(),
        recipient_phone: "0900000000".to_string(),
        delivery_address: "1 Test Street".to_string(),
        latitude: None,
        longitude: None,
        payment_reference: None,
        version: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Seed one pending order with two items
fn seed_order(store: &OrderStore, order_id: i64) {
    let order = test_order(order_id);
    let items = vec![
        OrderItem {
            order_id,
            product_id: 1,
            quantity: 2,
            unit_price: Decimal::from(50000),
        },
        OrderItem {
            order_id,
            product_id: 2,
            quantity: 1,
            unit_price: Decimal::from(50000),
        },
    ];
    let entry = OrderHistory::new(
        order_id,
        None,
        OrderStatus::Pending,
        HistoryAction::OrderCreated,
        "Order placed with 2 item(s)",
        order.buyer_id.to_string(),
    );
    store.create_order(&order, &items, &entry).unwrap();
}

struct TestEnv {
    store: OrderStore,
    sink: Arc<RecordingSink>,
    engine: AssignmentEngine,
}

/// Engine over an in-memory store, one seeded order (id 1), a verified
/// seller 7 and shipper 8, and a recording sink
fn test_env() -> TestEnv {
    let store = OrderStore::open_in_memory().unwrap();
    seed_order(&store, 1);

    let directory = Arc::new(InMemoryDirectory::new());
    directory.insert(test_user(7, UserRole::Seller, true));
    directory.insert(test_user(8, UserRole::Shipper, true));
    directory.insert(test_user(9, UserRole::Buyer, true));
    directory.insert(test_user(10, UserRole::Seller, false));

    let sink = Arc::new(RecordingSink::default());
    let engine = AssignmentEngine::new(
        store.clone(),
        directory,
        sink.clone(),
        Arc::new(FirstVerified),
    );
    TestEnv { store, sink, engine }
}
