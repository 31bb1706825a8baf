//! Stackwell Registry: Issuer directory, document ledger, and the public
//! verification query layer.

pub mod directory;
pub mod error;
pub mod registry;
pub mod store;
pub mod verifier;

pub use directory::{IssuerAuthorization, IssuerDirectory};
pub use error::RegistryError;
pub use registry::{DocumentRegistry, DocumentSubmission};
pub use store::{MemoryStore, RecordStore};
pub use verifier::{DocumentVerifier, VerificationResult};
