//! Stackwell Core: Fundamental types, errors, and configuration for the
//! Stackwell document registry.

pub mod config;
pub mod error;
pub mod types;

pub use config::{IssuerSeed, RegistryConfig};
pub use error::CoreError;
pub use types::{
    ContentHash, DocumentId, DocumentRecord, Identity, VerificationStatus, HASH_LEN,
};
