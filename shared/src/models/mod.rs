//! Domain models shared across crates

pub mod history;
pub mod notification;
pub mod order;
pub mod user;

pub use history::{HistoryAction, OrderHistory, SYSTEM_ACTOR};
pub use notification::{Notification, NotificationType};
pub use order::{
    AssignmentStatus, Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus,
};
pub use user::{User, UserRole};
