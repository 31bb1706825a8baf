//! RocksDB storage backend for the Stackwell node.

use anyhow::Result;
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, DB};
use std::path::Path;

use stackwell_core::{DocumentId, DocumentRecord, Identity};
use stackwell_registry::{IssuerAuthorization, RecordStore, RegistryError};

/// Column family names for different data types.
const CF_DOCUMENTS: &str = "documents";
const CF_ISSUERS: &str = "issuers";

/// RocksDB-backed storage for the registry.
///
/// Documents are keyed by big-endian id so iteration yields them in
/// registration order; values are JSON.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create a RocksDB database at the given path with column families.
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_DOCUMENTS, Options::default()),
            ColumnFamilyDescriptor::new(CF_ISSUERS, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self { db })
    }

    /// Put a value into a column family.
    pub fn put(&self, cf_name: &str, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", cf_name))?;
        self.db.put_cf(&cf, key, value)?;
        Ok(())
    }

    /// Get a value from a column family.
    pub fn get(&self, cf_name: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", cf_name))?;
        let value = self.db.get_cf(&cf, key)?;
        Ok(value)
    }

    /// All key/value pairs of a column family, in key order.
    pub fn scan(&self, cf_name: &str) -> Result<Vec<(Box<[u8]>, Box<[u8]>)>> {
        let cf = self
            .db
            .cf_handle(cf_name)
            .ok_or_else(|| anyhow::anyhow!("column family '{}' not found", cf_name))?;
        let mut entries = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            entries.push(item?);
        }
        Ok(entries)
    }

    /// Get a document record by id.
    pub fn get_document(&self, id: DocumentId) -> Result<Option<DocumentRecord>> {
        match self.get(CF_DOCUMENTS, &id.to_key())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn append(&self, record: &DocumentRecord) -> Result<()> {
        let key = record.id.to_key();
        if self.get(CF_DOCUMENTS, &key)?.is_some() {
            anyhow::bail!("document #{} already stored", record.id);
        }
        let value = serde_json::to_vec(record)?;
        self.put(CF_DOCUMENTS, &key, &value)
    }

    fn documents(&self) -> Result<Vec<DocumentRecord>> {
        self.scan(CF_DOCUMENTS)?
            .into_iter()
            .map(|(key, value)| {
                let id = DocumentId::from_key(&key)?;
                let record: DocumentRecord = serde_json::from_slice(&value)?;
                if record.id != id {
                    anyhow::bail!("record under key #{} claims id #{}", id, record.id);
                }
                Ok(record)
            })
            .collect()
    }

    fn issuers(&self) -> Result<Vec<(Identity, IssuerAuthorization)>> {
        self.scan(CF_ISSUERS)?
            .into_iter()
            .map(|(key, value)| {
                let identity = Identity::new(String::from_utf8(key.into_vec())?)?;
                let authorization: IssuerAuthorization = serde_json::from_slice(&value)?;
                Ok((identity, authorization))
            })
            .collect()
    }
}

fn storage_error(err: anyhow::Error) -> RegistryError {
    RegistryError::Storage(err.to_string())
}

impl RecordStore for Storage {
    fn append_record(&self, record: &DocumentRecord) -> Result<(), RegistryError> {
        self.append(record).map_err(storage_error)
    }

    fn load_records(&self) -> Result<Vec<DocumentRecord>, RegistryError> {
        self.documents().map_err(storage_error)
    }

    fn put_issuer(
        &self,
        identity: &Identity,
        authorization: &IssuerAuthorization,
    ) -> Result<(), RegistryError> {
        let value = serde_json::to_vec(authorization)
            .map_err(|e| RegistryError::Storage(e.to_string()))?;
        self.put(CF_ISSUERS, identity.as_str().as_bytes(), &value)
            .map_err(storage_error)
    }

    fn load_issuers(&self) -> Result<Vec<(Identity, IssuerAuthorization)>, RegistryError> {
        self.issuers().map_err(storage_error)
    }
}
