//! Commands dispatched from the HTTP API to the node's writer loop.
//!
//! Every registry mutation travels through this channel, so the node applies
//! writes one at a time in arrival order. Reads bypass it.

use serde::Serialize;
use tokio::sync::oneshot;

use stackwell_core::{DocumentRecord, Identity};
use stackwell_registry::{DocumentSubmission, RegistryError};

/// Reply channel carrying a registry result.
pub type Reply<T> = oneshot::Sender<Result<T, RegistryError>>;

/// A write command sent from the HTTP API to the node's main event loop.
pub enum NodeCommand {
    /// Register a document on behalf of its owner.
    SelfRegister {
        owner: Identity,
        submission: DocumentSubmission,
        reply: Reply<DocumentRecord>,
    },
    /// Issue a pre-verified document.
    IssueOfficial {
        issuer: Identity,
        owner: Identity,
        submission: DocumentSubmission,
        issuer_label: String,
        reply: Reply<DocumentRecord>,
    },
    /// Authorize an issuer.
    AuthorizeIssuer {
        caller: Identity,
        identity: Identity,
        display_name: String,
        reply: Reply<IssuerResponse>,
    },
    /// Revoke an issuer.
    RevokeIssuer {
        caller: Identity,
        identity: Identity,
        reply: Reply<IssuerResponse>,
    },
}

impl NodeCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelfRegister { .. } => "self_register",
            Self::IssueOfficial { .. } => "issue_official",
            Self::AuthorizeIssuer { .. } => "authorize_issuer",
            Self::RevokeIssuer { .. } => "revoke_issuer",
        }
    }
}

/// Issuer directory entry as reported over the API.
#[derive(Debug, Clone, Serialize)]
pub struct IssuerResponse {
    pub identity: String,
    pub authorized: bool,
    pub display_name: Option<String>,
}
