//! Fixtures shared by the cross-crate registry tests.

use std::sync::Arc;

use stackwell_core::{Identity, RegistryConfig};
use stackwell_registry::{
    DocumentRegistry, DocumentSubmission, IssuerDirectory, MemoryStore, RecordStore,
};

/// Administrator identity used throughout the tests.
pub const ADMIN: &str = "0xadmin";

/// Parse a test identity.
pub fn identity(raw: &str) -> Identity {
    Identity::new(raw).expect("test identity must be non-empty")
}

/// A registry over `store` whose directory is administered by [`ADMIN`].
pub fn registry_on(store: Arc<dyn RecordStore>) -> Arc<DocumentRegistry> {
    let config = RegistryConfig::with_admin(identity(ADMIN));
    let directory = Arc::new(
        IssuerDirectory::open(&config, store.clone()).expect("directory should open"),
    );
    Arc::new(DocumentRegistry::open(directory, store).expect("registry should open"))
}

/// A fresh in-memory registry administered by [`ADMIN`].
pub fn registry() -> Arc<DocumentRegistry> {
    registry_on(Arc::new(MemoryStore::new()))
}

/// A submission for the given file bytes.
pub fn submission(bytes: &[u8], document_type: &str, jurisdiction: &str) -> DocumentSubmission {
    DocumentSubmission::new(
        document_type,
        stackwell_crypto::digest(bytes),
        jurisdiction,
    )
}
