use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use stackwell_core::{ContentHash, DocumentId, DocumentRecord, Identity};

use crate::directory::IssuerDirectory;
use crate::error::RegistryError;
use crate::store::{MemoryStore, RecordStore};

/// Fields supplied by the submitter for either kind of registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSubmission {
    /// Free-text classification (e.g. "Diploma").
    pub document_type: String,
    /// Digest of the original file.
    pub content_hash: ContentHash,
    /// Digest or locator of a secondary artifact.
    #[serde(default)]
    pub aux_hash: Option<String>,
    /// Pointer to externally stored metadata.
    #[serde(default)]
    pub metadata_uri: String,
    /// Free-text locality.
    pub jurisdiction: String,
}

impl DocumentSubmission {
    /// A submission with no auxiliary artifact and no metadata pointer.
    pub fn new(
        document_type: impl Into<String>,
        content_hash: ContentHash,
        jurisdiction: impl Into<String>,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            content_hash,
            aux_hash: None,
            metadata_uri: String::new(),
            jurisdiction: jurisdiction.into(),
        }
    }

    /// Attach an auxiliary artifact hash.
    pub fn with_aux_hash(mut self, aux_hash: impl Into<String>) -> Self {
        self.aux_hash = Some(aux_hash.into());
        self
    }

    /// Attach a metadata URI.
    pub fn with_metadata_uri(mut self, uri: impl Into<String>) -> Self {
        self.metadata_uri = uri.into();
        self
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.document_type.trim().is_empty() {
            return Err(RegistryError::InvalidInput("document type is required".into()));
        }
        if self.jurisdiction.trim().is_empty() {
            return Err(RegistryError::InvalidInput("jurisdiction is required".into()));
        }
        Ok(())
    }
}

/// Who stands behind a new record.
struct Attestation {
    issuer: Identity,
    issuer_name: String,
    is_verified: bool,
}

/// Append-only ledger of document records.
///
/// The content-hash index is the serialization point: a registration holds
/// the vacant index entry for its hash until the record is persisted and
/// visible by id and by owner, so two registrations of the same bytes can
/// never both succeed.
///
/// That entry guard is a shard write lock held across
/// [`RecordStore::append_record`]. Hash lookups that land in the same shard
/// wait for the store write to finish; lookups by id and by owner do not.
pub struct DocumentRegistry {
    directory: Arc<IssuerDirectory>,
    store: Arc<dyn RecordStore>,
    /// Document id → record.
    records: DashMap<DocumentId, DocumentRecord>,
    /// Content hash → document id.
    by_hash: DashMap<ContentHash, DocumentId>,
    /// Owner → document ids, ascending.
    by_owner: DashMap<Identity, Vec<DocumentId>>,
    next_id: AtomicU64,
}

impl DocumentRegistry {
    /// Open the registry, replaying the store's record log to rebuild the
    /// indices and the id counter.
    pub fn open(
        directory: Arc<IssuerDirectory>,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, RegistryError> {
        let registry = Self {
            directory,
            store,
            records: DashMap::new(),
            by_hash: DashMap::new(),
            by_owner: DashMap::new(),
            next_id: AtomicU64::new(1),
        };

        let mut max_id = 0u64;
        for record in registry.store.load_records()? {
            max_id = max_id.max(record.id.value());
            let existing = registry.by_hash.get(&record.content_hash).map(|e| *e);
            if let Some(existing) = existing {
                tracing::warn!(
                    document_id = %record.id,
                    existing = %existing,
                    hash = %record.content_hash,
                    "skipping duplicate hash in record log"
                );
                continue;
            }
            registry.index(record);
        }
        registry.next_id.store(max_id + 1, Ordering::SeqCst);

        tracing::info!(
            documents = registry.records.len(),
            next_id = max_id + 1,
            "document registry opened"
        );
        Ok(registry)
    }

    /// An ephemeral registry backed by a fresh [`MemoryStore`].
    pub fn in_memory(directory: Arc<IssuerDirectory>) -> Self {
        Self {
            directory,
            store: Arc::new(MemoryStore::new()),
            records: DashMap::new(),
            by_hash: DashMap::new(),
            by_owner: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// The issuer directory consulted for official issuance.
    pub fn directory(&self) -> &Arc<IssuerDirectory> {
        &self.directory
    }

    /// Register a document on behalf of its owner. The record starts
    /// unverified and names the owner as its issuer.
    pub fn self_register(
        &self,
        owner: &Identity,
        submission: DocumentSubmission,
    ) -> Result<DocumentId, RegistryError> {
        let attestation = Attestation {
            issuer: owner.clone(),
            issuer_name: String::new(),
            is_verified: false,
        };
        self.insert_unique(owner, submission, attestation)
    }

    /// Register a pre-verified document issued by an authorized issuer.
    ///
    /// The record's issuer name is the directory's display name at this
    /// moment; `issuer_label` is used only when the directory has no name on
    /// file.
    pub fn issue_official(
        &self,
        issuer: &Identity,
        owner: &Identity,
        submission: DocumentSubmission,
        issuer_label: &str,
    ) -> Result<DocumentId, RegistryError> {
        let Some(display_name) = self.directory.display_name(issuer) else {
            tracing::warn!(issuer = %issuer, "issuance by unauthorized identity rejected");
            return Err(RegistryError::NotAuthorizedIssuer(issuer.clone()));
        };

        let issuer_name = if display_name.trim().is_empty() {
            issuer_label.trim().to_string()
        } else {
            display_name
        };

        let attestation = Attestation {
            issuer: issuer.clone(),
            issuer_name,
            is_verified: true,
        };
        self.insert_unique(owner, submission, attestation)
    }

    /// Get a record by id.
    pub fn get_document(&self, id: DocumentId) -> Result<DocumentRecord, RegistryError> {
        self.records
            .get(&id)
            .map(|e| e.clone())
            .ok_or(RegistryError::NotFound(id))
    }

    /// Every record owned by `owner`, in id (registration) order.
    pub fn documents_of(&self, owner: &Identity) -> Vec<DocumentRecord> {
        let ids = self
            .by_owner
            .get(owner)
            .map(|e| e.clone())
            .unwrap_or_default();
        ids.into_iter()
            .filter_map(|id| self.records.get(&id).map(|e| e.clone()))
            .collect()
    }

    /// Look up a record by content hash. An unknown hash is a normal,
    /// negative result.
    pub fn find_by_hash(&self, hash: &ContentHash) -> Option<DocumentRecord> {
        let id = self.by_hash.get(hash).map(|e| *e)?;
        self.records.get(&id).map(|e| e.clone())
    }

    /// Normalize a hash string, then look it up. Only malformed strings are
    /// errors.
    pub fn find_by_hash_str(&self, hash: &str) -> Result<Option<DocumentRecord>, RegistryError> {
        let hash = stackwell_crypto::normalize_hash(hash)?;
        Ok(self.find_by_hash(&hash))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of issuer-verified records.
    pub fn verified_count(&self) -> usize {
        self.records.iter().filter(|e| e.is_verified).count()
    }

    /// Check-then-insert shared by both registration paths.
    fn insert_unique(
        &self,
        owner: &Identity,
        submission: DocumentSubmission,
        attestation: Attestation,
    ) -> Result<DocumentId, RegistryError> {
        submission.validate()?;

        match self.by_hash.entry(submission.content_hash) {
            Entry::Occupied(slot) => {
                let existing = *slot.get();
                tracing::debug!(
                    hash = %submission.content_hash,
                    existing = %existing,
                    "duplicate registration rejected"
                );
                Err(RegistryError::DuplicateDocument {
                    content_hash: submission.content_hash,
                    existing,
                })
            }
            Entry::Vacant(slot) => {
                let id = DocumentId(self.next_id.fetch_add(1, Ordering::SeqCst));
                let record = DocumentRecord {
                    id,
                    owner: owner.clone(),
                    content_hash: submission.content_hash,
                    aux_hash: submission.aux_hash.filter(|h| !h.trim().is_empty()),
                    document_type: submission.document_type.trim().to_string(),
                    jurisdiction: submission.jurisdiction.trim().to_string(),
                    metadata_uri: submission.metadata_uri,
                    issuer: attestation.issuer,
                    issuer_name: attestation.issuer_name,
                    is_verified: attestation.is_verified,
                    timestamp: Utc::now(),
                };

                self.store.append_record(&record)?;

                self.records.insert(id, record.clone());
                self.add_to_owner(&record.owner, id);
                slot.insert(id);

                tracing::info!(
                    document_id = %id,
                    owner = %record.owner,
                    issuer = %record.issuer,
                    hash = %record.content_hash,
                    verified = record.is_verified,
                    "document registered"
                );
                Ok(id)
            }
        }
    }

    /// Add a replayed record to all indices.
    fn index(&self, record: DocumentRecord) {
        let id = record.id;
        self.by_hash.insert(record.content_hash, id);
        self.add_to_owner(&record.owner, id);
        self.records.insert(id, record);
    }

    /// Keep an owner's id list sorted. Ids are allocated before the store
    /// write, so concurrent registrations can finish out of id order.
    fn add_to_owner(&self, owner: &Identity, id: DocumentId) {
        let mut ids = self.by_owner.entry(owner.clone()).or_default();
        if let Err(pos) = ids.binary_search(&id) {
            ids.insert(pos, id);
        }
    }
}
