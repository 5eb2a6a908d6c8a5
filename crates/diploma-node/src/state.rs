//! Shared node state for cross-task communication.

use std::time::Instant;
use tokio::sync::mpsc;

use crate::commands::NodeCommand;

/// Shared state for the running node, accessible from HTTP handlers.
pub struct NodeState {
    /// When the node started.
    pub start_time: Instant,
    /// Shared secret for privileged operations.
    auth_token: String,
    /// Channel to send commands to the event loop.
    pub command_tx: mpsc::Sender<NodeCommand>,
}

impl NodeState {
    pub fn new(auth_token: String, command_tx: mpsc::Sender<NodeCommand>) -> Self {
        Self {
            start_time: Instant::now(),
            auth_token,
            command_tx,
        }
    }

    /// Whether `token` matches the configured shared secret.
    pub fn is_authorized(&self, token: Option<&str>) -> bool {
        token == Some(self.auth_token.as_str())
    }
}
