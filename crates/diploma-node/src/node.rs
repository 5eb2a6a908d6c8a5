//! The Diploma node orchestrator.
//!
//! Opens the stores, wires the registry to a notification queue, runs the
//! HTTP API server, and executes API commands one at a time on the main
//! event loop.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

use diploma_core::SystemClock;
use diploma_notify::QueueSink;
use diploma_registry::Registry;
use diploma_store::Stores;

use crate::commands::NodeCommand;
use crate::config::{DiplomaConfig, StorageBackend};
use crate::state::NodeState;

/// Capacity of the API command queue.
const COMMAND_CHANNEL_CAPACITY: usize = 256;

/// A Diploma node: one registry behind one command queue.
pub struct DiplomaNode {
    /// Node configuration.
    config: DiplomaConfig,
    /// All registry engines over the configured stores.
    registry: Registry,
    /// The notification log the registry writes to.
    notifications: Arc<QueueSink>,
    /// Shared state accessible from HTTP handlers.
    node_state: Arc<NodeState>,
    /// Receives commands from the HTTP API (taken by `run`).
    command_rx: Option<mpsc::Receiver<NodeCommand>>,
}

impl DiplomaNode {
    /// Create a node with the given config, opening the configured backend.
    pub fn new(config: DiplomaConfig) -> Result<Self> {
        let stores = match config.storage.backend {
            StorageBackend::Memory => {
                tracing::info!("using in-memory storage");
                Stores::in_memory()
            }
            StorageBackend::Rocksdb => {
                let stores = Stores::rocksdb(&config.storage.data_dir)?;
                tracing::info!(path = %config.storage.data_dir.display(), "storage initialized");
                stores
            }
        };

        let clock = Arc::new(SystemClock);
        let notifications = Arc::new(QueueSink::new(stores.notifications.clone(), clock.clone()));
        let registry = Registry::new(&stores, notifications.clone(), clock);

        let (command_tx, command_rx) = mpsc::channel::<NodeCommand>(COMMAND_CHANNEL_CAPACITY);
        let node_state = Arc::new(NodeState::new(config.auth.token.clone(), command_tx));

        tracing::info!(backend = ?config.storage.backend, "Diploma node created");

        Ok(Self {
            config,
            registry,
            notifications,
            node_state,
            command_rx: Some(command_rx),
        })
    }

    /// Start the HTTP API server in a background task.
    pub async fn start(&mut self) -> Result<()> {
        let api_addr: SocketAddr = self.config.api_addr().parse()?;
        let listener = tokio::net::TcpListener::bind(api_addr).await?;

        let api_state = self.node_state.clone();
        tokio::spawn(async move {
            if let Err(e) = crate::api::start_api_server(listener, api_state).await {
                tracing::error!(error = %e, "HTTP API server error");
            }
        });

        Ok(())
    }

    /// Run the node's main event loop until every command sender is gone.
    pub async fn run(&mut self) -> Result<()> {
        let mut command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already running"))?;

        tracing::info!("entering main event loop");

        while let Some(cmd) = command_rx.recv().await {
            tracing::debug!(command = cmd.name(), "handling API command");
            self.handle_api_command(cmd);
        }

        tracing::info!("API command channel closed");
        Ok(())
    }

    /// Gracefully shut down the node.
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down Diploma node");
        self.command_rx = None;
        Ok(())
    }

    /// Shared state for building routers.
    pub fn state(&self) -> Arc<NodeState> {
        self.node_state.clone()
    }

    /// Handle a command from the HTTP API. A dropped reply means the client
    /// went away; the operation itself has already been applied.
    fn handle_api_command(&self, cmd: NodeCommand) {
        let directory = self.registry.directory();
        let lifecycle = self.registry.lifecycle();
        let sharing = self.registry.sharing();
        let query = self.registry.query();

        match cmd {
            NodeCommand::CreateStudent { name, email, reply } => {
                let _ = reply.send(directory.create_student(&name, &email));
            }
            NodeCommand::GetStudent { id, reply } => {
                let _ = reply.send(directory.get_student(&id));
            }
            NodeCommand::ListStudents { reply } => {
                let _ = reply.send(directory.list_students());
            }
            NodeCommand::CreateInstitution {
                name,
                address,
                reply,
            } => {
                let _ = reply.send(directory.create_institution(&name, &address));
            }
            NodeCommand::GetInstitution { id, reply } => {
                let _ = reply.send(directory.get_institution(&id));
            }
            NodeCommand::ListInstitutions { reply } => {
                let _ = reply.send(directory.list_institutions());
            }
            NodeCommand::IssueCredential {
                student_id,
                institution_id,
                course,
                degree,
                graduation_year,
                reply,
            } => {
                let result =
                    lifecycle.issue(&student_id, &institution_id, &course, &degree, graduation_year);
                let _ = reply.send(result);
            }
            NodeCommand::GetCredential { id, reply } => {
                let _ = reply.send(lifecycle.get(&id));
            }
            NodeCommand::ListCredentials { reply } => {
                let _ = reply.send(query.list_all());
            }
            NodeCommand::RenewCredential { id, reply } => {
                let _ = reply.send(lifecycle.renew(&id));
            }
            NodeCommand::RevokeCredential { id, reason, reply } => {
                let _ = reply.send(lifecycle.revoke(&id, &reason));
            }
            NodeCommand::ShareCredential {
                id,
                recipient_id,
                expiration_date,
                permissions,
                reply,
            } => {
                let result = sharing.share(&id, &recipient_id, expiration_date, permissions);
                let _ = reply.send(result);
            }
            NodeCommand::ListShares { id, reply } => {
                let _ = reply.send(sharing.shares_for(&id));
            }
            NodeCommand::SearchCredentials { filter, reply } => {
                let _ = reply.send(query.search(&filter));
            }
            NodeCommand::VerifyCredential {
                student_id,
                institution_id,
                reply,
            } => {
                let _ = reply.send(query.verify(&student_id, &institution_id));
            }
            NodeCommand::Notifications {
                recipient_id,
                reply,
            } => {
                let _ = reply.send(self.notifications.notifications_for(&recipient_id));
            }
        }
    }
}
