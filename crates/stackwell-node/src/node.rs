//! The Stackwell node orchestrator.
//!
//! Opens storage, rebuilds the registry, serves the HTTP API, and runs the
//! single writer loop that applies registry mutations in arrival order.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

use stackwell_core::{ContentHash, DocumentId, DocumentRecord, Identity};
use stackwell_registry::{
    DocumentRegistry, DocumentSubmission, IssuerDirectory, MemoryStore, RecordStore,
    RegistryError,
};

use crate::commands::{IssuerResponse, NodeCommand};
use crate::config::StackwellConfig;
use crate::state::NodeState;
use crate::storage::Storage;

/// The Stackwell node.
pub struct StackwellNode {
    /// Node configuration.
    config: StackwellConfig,
    /// Issuer directory.
    directory: Arc<IssuerDirectory>,
    /// Document ledger.
    registry: Arc<DocumentRegistry>,
    /// Persistent storage (None when running ephemeral).
    storage: Option<Arc<Storage>>,
    /// Shared state accessible from HTTP handlers.
    node_state: Option<Arc<NodeState>>,
    /// Receives write commands from the HTTP API.
    command_rx: Option<mpsc::Receiver<NodeCommand>>,
}

impl StackwellNode {
    /// Create a node: open storage and rebuild the registry from it.
    pub fn new(config: StackwellConfig) -> Result<Self> {
        let (store, storage): (Arc<dyn RecordStore>, Option<Arc<Storage>>) =
            if config.storage.ephemeral {
                tracing::warn!("running with ephemeral in-memory storage");
                (Arc::new(MemoryStore::new()), None)
            } else {
                let storage = Arc::new(Storage::open(&config.storage.data_dir)?);
                tracing::info!(path = %config.storage.data_dir.display(), "storage initialized");
                (storage.clone(), Some(storage))
            };

        let directory = Arc::new(IssuerDirectory::open(&config.registry, store.clone())?);
        let registry = Arc::new(DocumentRegistry::open(directory.clone(), store)?);

        match directory.admin() {
            Some(admin) => tracing::info!(%admin, "registry administrator configured"),
            None => tracing::warn!("no registry administrator configured; issuer directory is read-only"),
        }
        tracing::info!(
            name = %config.name,
            documents = registry.len(),
            issuers = directory.authorized_count(),
            "Stackwell node created"
        );

        Ok(Self {
            config,
            directory,
            registry,
            storage,
            node_state: None,
            command_rx: None,
        })
    }

    /// Create the command lane and the shared state handed to API handlers.
    pub fn attach(&mut self) -> Arc<NodeState> {
        if let Some(state) = &self.node_state {
            return state.clone();
        }
        let (command_tx, command_rx) = mpsc::channel::<NodeCommand>(self.config.api.command_queue);
        let node_state = Arc::new(NodeState::new(
            self.config.name.clone(),
            self.registry.clone(),
            command_tx,
        ));
        self.node_state = Some(node_state.clone());
        self.command_rx = Some(command_rx);
        node_state
    }

    /// Start the node: create the command lane and spawn the HTTP API.
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("starting Stackwell node");

        let node_state = self.attach();
        let api_addr: SocketAddr = self.config.api_addr().parse()?;

        tokio::spawn(async move {
            if let Err(e) = crate::api::start_api_server(api_addr, node_state).await {
                tracing::error!(error = %e, "HTTP API server error");
            }
        });

        Ok(())
    }

    /// Run the writer loop until every command sender is gone.
    pub async fn run(&mut self) -> Result<()> {
        let mut command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("node not started"))?;
        // The loop must end once the API side hangs up.
        self.node_state = None;

        let registry = self.registry.clone();
        let directory = self.directory.clone();

        tracing::info!("entering main event loop");

        while let Some(cmd) = command_rx.recv().await {
            tracing::debug!(command = cmd.name(), "applying command");
            Self::handle_api_command(cmd, &registry, &directory);
        }

        tracing::info!("API command channel closed");
        Ok(())
    }

    /// Gracefully shut down the node.
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down Stackwell node");

        self.node_state = None;
        self.command_rx = None;

        if let Some(storage) = self.storage.take() {
            drop(storage);
            tracing::info!("storage closed");
        }

        tracing::info!("Stackwell node shut down");
        Ok(())
    }

    /// Get a reference to the document registry.
    pub fn registry(&self) -> &Arc<DocumentRegistry> {
        &self.registry
    }

    /// Get a reference to the issuer directory.
    pub fn directory(&self) -> &Arc<IssuerDirectory> {
        &self.directory
    }

    /// Apply one write command and answer on its reply channel.
    fn handle_api_command(
        cmd: NodeCommand,
        registry: &Arc<DocumentRegistry>,
        directory: &Arc<IssuerDirectory>,
    ) {
        match cmd {
            NodeCommand::SelfRegister {
                owner,
                submission,
                reply,
            } => {
                let result = Self::register(registry, |r| r.self_register(&owner, submission));
                let _ = reply.send(result);
            }
            NodeCommand::IssueOfficial {
                issuer,
                owner,
                submission,
                issuer_label,
                reply,
            } => {
                let result = Self::register(registry, |r| {
                    r.issue_official(&issuer, &owner, submission, &issuer_label)
                });
                let _ = reply.send(result);
            }
            NodeCommand::AuthorizeIssuer {
                caller,
                identity,
                display_name,
                reply,
            } => {
                let result = directory
                    .authorize(&caller, &identity, &display_name)
                    .map(|()| issuer_response(directory, &identity));
                let _ = reply.send(result);
            }
            NodeCommand::RevokeIssuer {
                caller,
                identity,
                reply,
            } => {
                let result = directory
                    .revoke(&caller, &identity)
                    .map(|_| issuer_response(directory, &identity));
                let _ = reply.send(result);
            }
        }
    }

    /// Run a registration and return the stored record.
    fn register<F>(registry: &DocumentRegistry, op: F) -> Result<DocumentRecord, RegistryError>
    where
        F: FnOnce(&DocumentRegistry) -> Result<DocumentId, RegistryError>,
    {
        let id = op(registry)?;
        registry.get_document(id)
    }
}

/// Current directory view of an identity.
pub fn issuer_response(directory: &IssuerDirectory, identity: &Identity) -> IssuerResponse {
    let entry = directory.entry(identity);
    IssuerResponse {
        identity: identity.to_string(),
        authorized: entry.as_ref().map(|e| e.authorized).unwrap_or(false),
        display_name: entry.map(|e| e.display_name),
    }
}

/// Build a submission from API fields.
pub fn submission(
    document_type: String,
    content_hash: &str,
    aux_hash: Option<String>,
    metadata_uri: Option<String>,
    jurisdiction: String,
) -> Result<DocumentSubmission, RegistryError> {
    let content_hash = ContentHash::parse(content_hash)?;
    Ok(DocumentSubmission {
        document_type,
        content_hash,
        aux_hash,
        metadata_uri: metadata_uri.unwrap_or_default(),
        jurisdiction,
    })
}
