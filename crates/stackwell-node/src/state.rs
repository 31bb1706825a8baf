//! State shared between the HTTP handlers and the node event loop.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use stackwell_registry::{DocumentRegistry, DocumentVerifier, IssuerDirectory};

use crate::commands::NodeCommand;

/// Read handles plus the write lane into the node.
pub struct NodeState {
    /// Node display name.
    pub name: String,
    /// When the node started.
    pub start_time: Instant,
    /// Public read-only queries.
    pub verifier: DocumentVerifier,
    /// Registry, for counts.
    pub registry: Arc<DocumentRegistry>,
    /// Issuer directory, for reads.
    pub directory: Arc<IssuerDirectory>,
    /// Sends write commands to the event loop.
    pub command_tx: mpsc::Sender<NodeCommand>,
}

impl NodeState {
    pub fn new(
        name: String,
        registry: Arc<DocumentRegistry>,
        command_tx: mpsc::Sender<NodeCommand>,
    ) -> Self {
        Self {
            name,
            start_time: Instant::now(),
            verifier: DocumentVerifier::new(registry.clone()),
            directory: registry.directory().clone(),
            registry,
            command_tx,
        }
    }
}
