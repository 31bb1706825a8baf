/// Core type validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid content hash: {0}")]
    InvalidHash(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid document id: {0}")]
    InvalidDocumentId(String),
}
