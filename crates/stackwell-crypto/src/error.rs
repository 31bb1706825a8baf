/// Hashing errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("i/o error while hashing: {0}")]
    Io(#[from] std::io::Error),
}

impl From<stackwell_core::CoreError> for CryptoError {
    fn from(err: stackwell_core::CoreError) -> Self {
        match err {
            stackwell_core::CoreError::InvalidHash(msg) => Self::InvalidHash(msg),
            other => Self::InvalidHash(other.to_string()),
        }
    }
}
