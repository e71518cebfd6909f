//! Persisting notification dispatcher with broadcast fan-out

use super::NotificationSink;
use crate::orders::storage::OrderStore;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Notification, NotificationType};
use tokio::sync::broadcast;

/// Broadcast channel capacity for in-process subscribers
const NOTIFICATION_CHANNEL_CAPACITY: usize = 4096;

/// Persists notification rows and fans them out to live subscribers
///
/// Each row is written in its own transaction; the dispatcher never
/// participates in the unit of work of the transition that triggered it.
pub struct NotificationDispatcher {
    store: OrderStore,
    event_tx: broadcast::Sender<Notification>,
}

impl NotificationDispatcher {
    pub fn new(store: OrderStore) -> Self {
        let (event_tx, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self { store, event_tx }
    }

    /// Subscribe to notification broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.event_tx.subscribe()
    }

    /// Notifications for a user, newest first
    pub fn list_for_user(&self, user_id: i64) -> AppResult<Vec<Notification>> {
        self.store
            .notifications_for_user(user_id)
            .map_err(|e| AppError::database(e.to_string()))
    }

    /// Unread notification count for a user
    pub fn unread_count(&self, user_id: i64) -> AppResult<usize> {
        Ok(self
            .list_for_user(user_id)?
            .iter()
            .filter(|n| !n.is_read)
            .count())
    }

    /// Mark one notification as read
    pub fn mark_read(&self, notification_id: i64) -> AppResult<()> {
        let found = self
            .store
            .mark_notification_read(notification_id)
            .map_err(|e| AppError::database(e.to_string()))?;
        if !found {
            return Err(AppError::with_message(
                ErrorCode::NotFound,
                format!("Notification {} not found", notification_id),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl NotificationSink for NotificationDispatcher {
    async fn notify(
        &self,
        user_id: i64,
        kind: NotificationType,
        title: &str,
        body: &str,
    ) -> AppResult<()> {
        let notification = Notification::new(user_id, kind, title, body);
        self.store.insert_notification(&notification).map_err(|e| {
            AppError::with_message(ErrorCode::NotificationFailed, e.to_string())
        })?;

        if self.event_tx.send(notification).is_err() {
            tracing::warn!("Notification broadcast failed: no active receivers");
        }
        Ok(())
    }
}
