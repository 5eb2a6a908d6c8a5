use std::sync::Mutex;

/// A fire-and-forget channel for event messages addressed to a recipient.
///
/// `send` never reports failure to the caller.
pub trait NotificationSink: Send + Sync {
    fn send(&self, recipient_id: &str, message: &str);
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn send(&self, _recipient_id: &str, _message: &str) {}
}

/// A message captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient_id: String,
    pub message: String,
}

/// Keeps every message in memory so tests can assert on what was sent.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in send order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Messages addressed to `recipient_id`.
    pub fn sent_to(&self, recipient_id: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|m| m.recipient_id == recipient_id)
            .map(|m| m.message)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl NotificationSink for RecordingSink {
    fn send(&self, recipient_id: &str, message: &str) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentMessage {
                recipient_id: recipient_id.to_string(),
                message: message.to_string(),
            });
    }
}
