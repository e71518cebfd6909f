//! redb-based storage layer for orders, history, and notifications
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` | Canonical order records |
//! | `order_items` | `(order_id, product_id)` | `OrderItem` | Immutable line items |
//! | `order_history` | `(order_id, seq)` | `OrderHistory` | Audit trail (append-only) |
//! | `notifications` | `notification_id` | `Notification` | Notification rows |
//! | `payment_refs` | `reference` | `order_id` | External payment reference index |
//! | `sequence_counter` | `()` | `u64` | Global history sequence |
//!
//! # Atomicity
//!
//! Every accepted order transition is one write transaction covering the
//! order replace and its history append: the entry exists if and only if
//! the order fields reflect the transition. Notification rows are written
//! in their own transaction so a failure there cannot touch an already
//! committed transition.
//!
//! # Concurrency
//!
//! [`OrderStore::commit_transition`] re-reads the order inside the write
//! transaction and compares `version` against the value the caller read.
//! redb admits a single writer at a time, so the check is authoritative:
//! of two racing transitions built from the same read, exactly one commits
//! and the other gets [`StorageError::VersionConflict`].

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use shared::models::{Notification, Order, OrderHistory, OrderItem, OrderStatus, UserRole};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for orders: key = order id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Table for line items: key = (order_id, product_id), value = JSON-serialized OrderItem
const ORDER_ITEMS_TABLE: TableDefinition<(i64, i64), &[u8]> = TableDefinition::new("order_items");

/// Table for the audit trail: key = (order_id, seq), value = JSON-serialized OrderHistory
const HISTORY_TABLE: TableDefinition<(i64, u64), &[u8]> = TableDefinition::new("order_history");

/// Table for notification rows: key = notification id, value = JSON-serialized Notification
const NOTIFICATIONS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("notifications");

/// Table for the payment reference index: key = external reference, value = order id
const PAYMENT_REFS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("payment_refs");

/// Table for the history sequence counter: key = "seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Version conflict on order {order_id}: expected {expected}, found {actual}")]
    VersionConflict {
        order_id: i64,
        expected: u64,
        actual: u64,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order store backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl OrderStore {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate`: once `commit()` returns
    /// the transition is persistent, and the file is always in a
    /// consistent state (copy-on-write with atomic pointer swap).
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db: Arc::new(db) };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDER_ITEMS_TABLE)?;
            let _ = write_txn.open_table(HISTORY_TABLE)?;
            let _ = write_txn.open_table(NOTIFICATIONS_TABLE)?;
            let _ = write_txn.open_table(PAYMENT_REFS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Sequence Operations ==========

    /// Increment and return the history sequence number (within transaction)
    fn increment_sequence(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(SEQUENCE_KEY, next)?;
        Ok(next)
    }

    /// Append a history entry at the next sequence (within transaction)
    fn append_history(&self, txn: &WriteTransaction, entry: &OrderHistory) -> StorageResult<()> {
        let seq = self.increment_sequence(txn)?;
        let mut table = txn.open_table(HISTORY_TABLE)?;
        let value = serde_json::to_vec(entry)?;
        table.insert((entry.order_id, seq), value.as_slice())?;
        Ok(())
    }

    fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.id, value.as_slice())?;
        Ok(())
    }

    // ========== Order Operations ==========

    /// Persist a new order with its items and creation history entry
    ///
    /// One transaction: order, item batch, payment reference index entry
    /// (when present), and the `order_created` audit record.
    pub fn create_order(
        &self,
        order: &Order,
        items: &[OrderItem],
        entry: &OrderHistory,
    ) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            self.store_order(&txn, order)?;

            let mut items_table = txn.open_table(ORDER_ITEMS_TABLE)?;
            for item in items {
                let value = serde_json::to_vec(item)?;
                items_table.insert((item.order_id, item.product_id), value.as_slice())?;
            }
            drop(items_table);

            if let Some(reference) = &order.payment_reference {
                let mut refs_table = txn.open_table(PAYMENT_REFS_TABLE)?;
                refs_table.insert(reference.as_str(), order.id)?;
            }

            self.append_history(&txn, entry)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get an order by id
    pub fn get_order(&self, order_id: i64) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Replace an order's mutable fields and append the paired history entry
    ///
    /// The caller passes the `version` it read; if the stored order has
    /// moved on since, nothing is written and
    /// [`StorageError::VersionConflict`] is returned. On success the
    /// stored version is bumped and the committed order is returned.
    pub fn commit_transition(
        &self,
        updated: &Order,
        expected_version: u64,
        entry: &OrderHistory,
    ) -> StorageResult<Order> {
        let txn = self.db.begin_write()?;
        let committed = {
            let table = txn.open_table(ORDERS_TABLE)?;
            let current: Order = match table.get(updated.id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(StorageError::OrderNotFound(updated.id)),
            };
            drop(table);

            if current.version != expected_version {
                return Err(StorageError::VersionConflict {
                    order_id: updated.id,
                    expected: expected_version,
                    actual: current.version,
                });
            }

            let mut committed = updated.clone();
            committed.version = expected_version + 1;
            committed.updated_at = shared::util::now_millis();
            self.store_order(&txn, &committed)?;
            self.append_history(&txn, entry)?;
            committed
        };
        txn.commit()?;
        Ok(committed)
    }

    /// Get the line items of an order
    pub fn get_items(&self, order_id: i64) -> StorageResult<Vec<OrderItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDER_ITEMS_TABLE)?;

        let mut items = Vec::new();
        let range_start = (order_id, i64::MIN);
        let range_end = (order_id, i64::MAX);
        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    /// Scan all orders, keeping those matching the predicate
    fn scan_orders<F>(&self, mut keep: F) -> StorageResult<Vec<Order>>
    where
        F: FnMut(&Order) -> bool,
    {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if keep(&order) {
                orders.push(order);
            }
        }
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// All orders, time-ascending
    pub fn find_all(&self) -> StorageResult<Vec<Order>> {
        self.scan_orders(|_| true)
    }

    pub fn find_by_buyer(&self, buyer_id: i64) -> StorageResult<Vec<Order>> {
        self.scan_orders(|o| o.buyer_id == buyer_id)
    }

    pub fn find_by_shop(&self, shop_id: i64) -> StorageResult<Vec<Order>> {
        self.scan_orders(|o| o.shop_id == shop_id)
    }

    pub fn find_by_status(&self, status: OrderStatus) -> StorageResult<Vec<Order>> {
        self.scan_orders(|o| o.status == status)
    }

    /// Orders created in `[from, to)` (millisecond timestamps)
    pub fn find_created_between(&self, from: i64, to: i64) -> StorageResult<Vec<Order>> {
        self.scan_orders(|o| o.created_at >= from && o.created_at < to)
    }

    /// Orders awaiting a decision from the given actor for their role
    pub fn find_assigned(&self, user_id: i64, role: UserRole) -> StorageResult<Vec<Order>> {
        use shared::models::AssignmentStatus;
        self.scan_orders(|o| {
            o.assignment_status == AssignmentStatus::Assigned
                && match role {
                    UserRole::Seller => o.assigned_seller_id == Some(user_id),
                    UserRole::Shipper => o.assigned_shipper_id == Some(user_id),
                    _ => false,
                }
        })
    }

    // ========== History Operations ==========

    /// Audit trail for one order, time-ascending
    pub fn history_for_order(&self, order_id: i64) -> StorageResult<Vec<OrderHistory>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(HISTORY_TABLE)?;

        let mut entries = Vec::new();
        let range_start = (order_id, 0u64);
        let range_end = (order_id, u64::MAX);
        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            entries.push(serde_json::from_slice(value.value())?);
        }
        Ok(entries)
    }

    // ========== Payment Reference Index ==========

    /// Resolve an external payment reference to an order id
    pub fn order_id_for_payment_ref(&self, reference: &str) -> StorageResult<Option<i64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENT_REFS_TABLE)?;
        Ok(table.get(reference)?.map(|guard| guard.value()))
    }

    // ========== Notification Operations ==========

    /// Persist a notification row in its own transaction
    ///
    /// Deliberately not part of any transition transaction (§ module docs).
    pub fn insert_notification(&self, notification: &Notification) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            let value = serde_json::to_vec(notification)?;
            table.insert(notification.id, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Notifications for a user, newest first
    pub fn notifications_for_user(&self, user_id: i64) -> StorageResult<Vec<Notification>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS_TABLE)?;

        let mut rows = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let row: Notification = serde_json::from_slice(value.value())?;
            if row.user_id == user_id {
                rows.push(row);
            }
        }
        rows.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        Ok(rows)
    }

    /// Mark a notification as read; returns false when the row is absent
    pub fn mark_notification_read(&self, notification_id: i64) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let found = {
            let mut table = txn.open_table(NOTIFICATIONS_TABLE)?;
            let row: Option<Notification> = match table.get(notification_id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            match row {
                Some(mut row) => {
                    row.is_read = true;
                    let value = serde_json::to_vec(&row)?;
                    table.insert(notification_id, value.as_slice())?;
                    true
                }
                None => false,
            }
        };
        txn.commit()?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::{
        AssignmentStatus, HistoryAction, NotificationType, OrderStatus,
    };

    fn sample_order(id: i64) -> Order {
        Order {
            id,
            buyer_id: 1,
            shop_id: 10,
            delivery_address_id: 100,
            total_amount: Decimal::new(150_000, 0),
            status: OrderStatus::Pending,
            assignment_status: AssignmentStatus::Unassigned,
            assigned_seller_id: None,
            assigned_shipper_id: None,
            voucher_id: None,
            notes: None,
            recipient_name: "Ana".to_string(),
            recipient_phone: "600123456".to_string(),
            delivery_address: "Calle Mayor 1".to_string(),
            latitude: None,
            longitude: None,
            payment_reference: Some(format!("PAY-{}", id)),
            version: 0,
            created_at: shared::util::now_millis(),
            updated_at: shared::util::now_millis(),
        }
    }

    fn created_entry(order: &Order) -> OrderHistory {
        OrderHistory::new(
            order.id,
            None,
            OrderStatus::Pending,
            HistoryAction::OrderCreated,
            "Order placed",
            order.buyer_id.to_string(),
        )
    }

    #[test]
    fn test_create_and_get_order() {
        let store = OrderStore::open_in_memory().unwrap();
        let order = sample_order(1);
        let items = vec![OrderItem {
            order_id: 1,
            product_id: 5,
            quantity: 2,
            unit_price: Decimal::new(50_000, 0),
        }];

        store
            .create_order(&order, &items, &created_entry(&order))
            .unwrap();

        let loaded = store.get_order(1).unwrap().unwrap();
        assert_eq!(loaded.buyer_id, 1);
        assert_eq!(loaded.status, OrderStatus::Pending);
        assert_eq!(store.get_items(1).unwrap(), items);
        assert!(store.get_order(99).unwrap().is_none());
    }

    #[test]
    fn test_commit_transition_pairs_history() {
        let store = OrderStore::open_in_memory().unwrap();
        let order = sample_order(2);
        store.create_order(&order, &[], &created_entry(&order)).unwrap();

        let mut updated = order.clone();
        updated.assigned_seller_id = Some(7);
        updated.assignment_status = AssignmentStatus::Assigned;
        let entry = OrderHistory::new(
            2,
            Some(OrderStatus::Pending),
            OrderStatus::Pending,
            HistoryAction::OrderAssignedToSeller,
            "Assigned to seller 7",
            "admin:3",
        );
        let committed = store.commit_transition(&updated, 0, &entry).unwrap();

        assert_eq!(committed.version, 1);
        let history = store.history_for_order(2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].action, HistoryAction::OrderAssignedToSeller);
    }

    #[test]
    fn test_version_conflict_writes_nothing() {
        let store = OrderStore::open_in_memory().unwrap();
        let order = sample_order(3);
        store.create_order(&order, &[], &created_entry(&order)).unwrap();

        let mut first = order.clone();
        first.assignment_status = AssignmentStatus::Assigned;
        first.assigned_seller_id = Some(7);
        let entry = OrderHistory::new(
            3,
            Some(OrderStatus::Pending),
            OrderStatus::Pending,
            HistoryAction::OrderAssignedToSeller,
            "first",
            "admin:3",
        );
        store.commit_transition(&first, 0, &entry).unwrap();

        // Second writer still holds version 0
        let mut second = order.clone();
        second.assigned_seller_id = Some(8);
        let stale = store.commit_transition(&second, 0, &entry);
        assert!(matches!(
            stale,
            Err(StorageError::VersionConflict { actual: 1, .. })
        ));

        // The losing write left no trace
        let current = store.get_order(3).unwrap().unwrap();
        assert_eq!(current.assigned_seller_id, Some(7));
        assert_eq!(store.history_for_order(3).unwrap().len(), 2);
    }

    #[test]
    fn test_history_is_time_ascending() {
        let store = OrderStore::open_in_memory().unwrap();
        let order = sample_order(4);
        store.create_order(&order, &[], &created_entry(&order)).unwrap();

        let mut current = store.get_order(4).unwrap().unwrap();
        for action in [
            HistoryAction::OrderAssignedToSeller,
            HistoryAction::OrderRejectedBySeller,
        ] {
            let entry = OrderHistory::new(
                4,
                Some(current.status),
                current.status,
                action,
                "",
                "7",
            );
            current = store
                .commit_transition(&current, current.version, &entry)
                .unwrap();
        }

        let history = store.history_for_order(4).unwrap();
        let actions: Vec<_> = history.iter().map(|h| h.action).collect();
        assert_eq!(
            actions,
            vec![
                HistoryAction::OrderCreated,
                HistoryAction::OrderAssignedToSeller,
                HistoryAction::OrderRejectedBySeller,
            ]
        );
    }

    #[test]
    fn test_payment_ref_lookup() {
        let store = OrderStore::open_in_memory().unwrap();
        let order = sample_order(5);
        store.create_order(&order, &[], &created_entry(&order)).unwrap();

        assert_eq!(store.order_id_for_payment_ref("PAY-5").unwrap(), Some(5));
        assert_eq!(store.order_id_for_payment_ref("PAY-404").unwrap(), None);
    }

    #[test]
    fn test_find_filters() {
        let store = OrderStore::open_in_memory().unwrap();
        for id in 1..=3 {
            let mut order = sample_order(id);
            order.buyer_id = if id == 3 { 2 } else { 1 };
            order.payment_reference = None;
            store.create_order(&order, &[], &created_entry(&order)).unwrap();
        }

        assert_eq!(store.find_by_buyer(1).unwrap().len(), 2);
        assert_eq!(store.find_by_shop(10).unwrap().len(), 3);
        assert_eq!(
            store.find_by_status(OrderStatus::Pending).unwrap().len(),
            3
        );
        assert!(store.find_assigned(7, UserRole::Seller).unwrap().is_empty());
    }

    #[test]
    fn test_notification_rows() {
        let store = OrderStore::open_in_memory().unwrap();
        let n = Notification::new(9, NotificationType::Order, "Placed", "Order 1 placed");
        store.insert_notification(&n).unwrap();

        let rows = store.notifications_for_user(9).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_read);

        assert!(store.mark_notification_read(n.id).unwrap());
        assert!(store.notifications_for_user(9).unwrap()[0].is_read);
        assert!(!store.mark_notification_read(12345).unwrap());
    }
}
