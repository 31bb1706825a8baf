use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stackwell_core::{DocumentId, DocumentRecord, Identity, VerificationStatus};

use crate::error::RegistryError;
use crate::registry::DocumentRegistry;

/// Outcome of a public verification lookup.
///
/// `exists = false` is a successful answer, not a failure; every other field
/// is then empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether a record with the hash is registered.
    pub exists: bool,
    /// Whether the record was issued by an authorized issuer.
    pub is_verified: bool,
    /// Document classification.
    pub document_type: String,
    /// Issuer display name snapshotted at registration.
    pub issuer_name: String,
    /// Document locality.
    pub jurisdiction: String,
    /// Registration time.
    pub timestamp: Option<DateTime<Utc>>,
}

impl VerificationResult {
    /// The negative answer.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Verified/pending status, or `None` when nothing is registered.
    pub fn status(&self) -> Option<VerificationStatus> {
        self.exists
            .then(|| VerificationStatus::from_flag(self.is_verified))
    }
}

impl From<&DocumentRecord> for VerificationResult {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            exists: true,
            is_verified: record.is_verified,
            document_type: record.document_type.clone(),
            issuer_name: record.issuer_name.clone(),
            jurisdiction: record.jurisdiction.clone(),
            timestamp: Some(record.timestamp),
        }
    }
}

/// Read-only query surface over the registry for anonymous callers.
#[derive(Clone)]
pub struct DocumentVerifier {
    registry: Arc<DocumentRegistry>,
}

impl DocumentVerifier {
    /// Create a verifier over a registry.
    pub fn new(registry: Arc<DocumentRegistry>) -> Self {
        Self { registry }
    }

    /// Confirm whether a document with the given hash is registered and how.
    /// Only a malformed hash string is an error.
    pub fn verify(&self, hash: &str) -> Result<VerificationResult, RegistryError> {
        let result = match self.registry.find_by_hash_str(hash)? {
            Some(record) => VerificationResult::from(&record),
            None => VerificationResult::not_found(),
        };
        tracing::debug!(
            hash,
            exists = result.exists,
            verified = result.is_verified,
            "verification lookup"
        );
        Ok(result)
    }

    /// Hash a document's bytes and verify the digest.
    pub fn verify_bytes(&self, bytes: &[u8]) -> VerificationResult {
        let hash = stackwell_crypto::digest(bytes);
        self.registry
            .find_by_hash(&hash)
            .map(|record| VerificationResult::from(&record))
            .unwrap_or_default()
    }

    /// Public view of a record by id.
    pub fn document(&self, id: DocumentId) -> Result<DocumentRecord, RegistryError> {
        self.registry.get_document(id)
    }

    /// Public view of an owner's records, in registration order.
    pub fn documents_of(&self, owner: &Identity) -> Vec<DocumentRecord> {
        self.registry.documents_of(owner)
    }
}
