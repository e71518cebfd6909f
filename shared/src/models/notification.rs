//! Notification Model

use serde::{Deserialize, Serialize};

/// Notification type tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Order,
    Promotion,
    Message,
    Delivery,
    System,
}

/// Notification entity
///
/// Created as a side effect of an order transition; its lifecycle is
/// independent of the order that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: i64,
}

impl Notification {
    pub fn new(
        user_id: i64,
        kind: NotificationType,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::util::snowflake_id(),
            user_id,
            kind,
            title: title.into(),
            body: body.into(),
            is_read: false,
            created_at: crate::util::now_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_type_tag() {
        let n = Notification::new(5, NotificationType::Delivery, "On the way", "Order shipped");
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"type\":\"DELIVERY\""));
        assert!(!n.is_read);
    }
}
