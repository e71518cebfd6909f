//! Order store and order lifecycle service
//!
//! [`storage`] owns the durable records (orders, items, the append-only
//! history ledger, notification rows). [`service`] layers the lifecycle
//! operations on top: creation, retrieval, cancellation, and the
//! idempotent payment-callback status update. Seller/shipper assignment
//! lives in [`crate::assignment`].

pub mod service;
pub mod storage;

pub use service::OrderService;
pub use storage::{OrderStore, StorageError, StorageResult};
