use stackwell_core::{ContentHash, DocumentId, Identity};

/// Registry errors. Every variant is local and non-fatal: a failed operation
/// leaves the registry exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("document {content_hash} is already registered as #{existing}")]
    DuplicateDocument {
        content_hash: ContentHash,
        existing: DocumentId,
    },

    #[error("{0} is not an authorized issuer")]
    NotAuthorizedIssuer(Identity),

    #[error("document #{0} not found")]
    NotFound(DocumentId),

    #[error("permission denied for {0}")]
    PermissionDenied(Identity),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl RegistryError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateDocument { .. } => "duplicate_document",
            Self::NotAuthorizedIssuer(_) => "not_authorized_issuer",
            Self::NotFound(_) => "not_found",
            Self::PermissionDenied(_) => "permission_denied",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidHash(_) => "invalid_hash",
            Self::Storage(_) => "storage",
        }
    }
}

impl From<stackwell_core::CoreError> for RegistryError {
    fn from(err: stackwell_core::CoreError) -> Self {
        match err {
            stackwell_core::CoreError::InvalidHash(msg) => Self::InvalidHash(msg),
            other => Self::InvalidInput(other.to_string()),
        }
    }
}

impl From<stackwell_crypto::CryptoError> for RegistryError {
    fn from(err: stackwell_crypto::CryptoError) -> Self {
        match err {
            stackwell_crypto::CryptoError::InvalidHash(msg) => Self::InvalidHash(msg),
            other => Self::InvalidInput(other.to_string()),
        }
    }
}
