//! Notification dispatch
//!
//! A transition that commits must stay committed no matter what happens
//! here: the dispatcher persists each notification row in its own write
//! transaction and callers go through [`notify_best_effort`], which logs
//! failures instead of propagating them.

mod dispatcher;

pub use dispatcher::NotificationDispatcher;

use shared::error::AppResult;
use shared::models::NotificationType;

/// Fire-and-forget delivery target for transition side effects
///
/// The production implementation is [`NotificationDispatcher`]; tests
/// substitute failing or recording sinks through this seam.
#[async_trait::async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(
        &self,
        user_id: i64,
        kind: NotificationType,
        title: &str,
        body: &str,
    ) -> AppResult<()>;
}

/// Deliver a notification, swallowing any failure
///
/// The triggering transition is already committed; a delivery failure is
/// logged and the caller's result is unaffected.
pub async fn notify_best_effort(
    sink: &dyn NotificationSink,
    user_id: i64,
    kind: NotificationType,
    title: &str,
    body: &str,
) {
    if let Err(err) = sink.notify(user_id, kind, title, body).await {
        tracing::error!(
            user_id,
            error = %err,
            "Notification delivery failed, transition unaffected"
        );
    }
}
