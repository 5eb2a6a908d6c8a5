use std::sync::Arc;

use diploma_core::{Clock, CoreError, Notification};
use diploma_store::Collection;

use crate::sink::NotificationSink;

/// Logs each message and appends it to the notification log collection.
///
/// A failed append is logged and dropped; the triggering registry operation
/// is never affected.
pub struct QueueSink {
    log: Arc<dyn Collection<Notification>>,
    clock: Arc<dyn Clock>,
}

impl QueueSink {
    pub fn new(log: Arc<dyn Collection<Notification>>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    /// Every notification addressed to `recipient_id`, oldest first.
    pub fn notifications_for(&self, recipient_id: &str) -> Result<Vec<Notification>, CoreError> {
        Ok(self
            .log
            .values()?
            .into_iter()
            .filter(|n| n.recipient_id == recipient_id)
            .collect())
    }
}

impl NotificationSink for QueueSink {
    fn send(&self, recipient_id: &str, message: &str) {
        let notification = Notification::new(recipient_id, message, self.clock.now());
        tracing::info!(
            recipient = recipient_id,
            notification_id = %notification.id,
            text = message,
            "notification sent"
        );
        if let Err(e) = self.log.insert(&notification) {
            tracing::warn!(
                recipient = recipient_id,
                error = %e,
                "failed to append notification to log"
            );
        }
    }
}
