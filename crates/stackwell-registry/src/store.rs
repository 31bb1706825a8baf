//! Persistence seam for the registry.
//!
//! Document records are appended, never rewritten. Issuer authorizations are
//! upserted by identity. On startup the registry replays both to rebuild its
//! in-memory indices.

use std::sync::Mutex;

use dashmap::DashMap;
use stackwell_core::{DocumentRecord, Identity};

use crate::directory::IssuerAuthorization;
use crate::error::RegistryError;

/// Durable backing store for registry state.
pub trait RecordStore: Send + Sync {
    /// Append a fully constructed record to the log.
    fn append_record(&self, record: &DocumentRecord) -> Result<(), RegistryError>;

    /// Every stored record, in ascending id order.
    fn load_records(&self) -> Result<Vec<DocumentRecord>, RegistryError>;

    /// Upsert an issuer authorization.
    fn put_issuer(
        &self,
        identity: &Identity,
        authorization: &IssuerAuthorization,
    ) -> Result<(), RegistryError>;

    /// Every stored issuer authorization.
    fn load_issuers(&self) -> Result<Vec<(Identity, IssuerAuthorization)>, RegistryError>;
}

/// In-memory store, used for ephemeral registries and tests.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<DocumentRecord>>,
    issuers: DashMap<Identity, IssuerAuthorization>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of appended records.
    pub fn record_count(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }
}

fn poisoned() -> RegistryError {
    RegistryError::Storage("memory store lock poisoned".into())
}

impl RecordStore for MemoryStore {
    fn append_record(&self, record: &DocumentRecord) -> Result<(), RegistryError> {
        self.records
            .lock()
            .map_err(|_| poisoned())?
            .push(record.clone());
        Ok(())
    }

    fn load_records(&self) -> Result<Vec<DocumentRecord>, RegistryError> {
        let mut records = self.records.lock().map_err(|_| poisoned())?.clone();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    fn put_issuer(
        &self,
        identity: &Identity,
        authorization: &IssuerAuthorization,
    ) -> Result<(), RegistryError> {
        self.issuers.insert(identity.clone(), authorization.clone());
        Ok(())
    }

    fn load_issuers(&self) -> Result<Vec<(Identity, IssuerAuthorization)>, RegistryError> {
        Ok(self
            .issuers
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect())
    }
}
