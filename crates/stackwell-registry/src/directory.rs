use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use stackwell_core::{Identity, RegistryConfig};

use crate::error::RegistryError;
use crate::store::{MemoryStore, RecordStore};

/// Authorization state of a single issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerAuthorization {
    /// Whether the identity may currently issue official documents.
    pub authorized: bool,
    /// Name shown on records the issuer creates.
    pub display_name: String,
}

impl IssuerAuthorization {
    /// An active authorization with the given display name.
    pub fn granted(display_name: impl Into<String>) -> Self {
        Self {
            authorized: true,
            display_name: display_name.into(),
        }
    }
}

/// Directory of identities allowed to issue pre-verified documents.
///
/// Only the configured administrator may change it. Reads never fail.
pub struct IssuerDirectory {
    /// Administrative identity, if any.
    admin: Option<Identity>,
    /// Issuer identity → authorization.
    entries: DashMap<Identity, IssuerAuthorization>,
    /// Write-through persistence.
    store: Arc<dyn RecordStore>,
}

impl IssuerDirectory {
    /// Open the directory: restore persisted authorizations, then apply the
    /// configured bootstrap issuers.
    pub fn open(config: &RegistryConfig, store: Arc<dyn RecordStore>) -> Result<Self, RegistryError> {
        let directory = Self {
            admin: config.admin.clone(),
            entries: DashMap::new(),
            store,
        };

        for (identity, authorization) in directory.store.load_issuers()? {
            directory.entries.insert(identity, authorization);
        }
        tracing::debug!(issuers = directory.entries.len(), "issuer directory restored");

        for seed in &config.bootstrap_issuers {
            directory.upsert(&seed.identity, IssuerAuthorization::granted(&seed.display_name))?;
        }

        Ok(directory)
    }

    /// An ephemeral directory backed by a fresh [`MemoryStore`].
    pub fn in_memory(config: &RegistryConfig) -> Result<Self, RegistryError> {
        Self::open(config, Arc::new(MemoryStore::new()))
    }

    /// The administrative identity.
    pub fn admin(&self) -> Option<&Identity> {
        self.admin.as_ref()
    }

    /// Authorize `identity` to issue official documents under `display_name`.
    /// Repeating the same call is a no-op.
    pub fn authorize(
        &self,
        caller: &Identity,
        identity: &Identity,
        display_name: &str,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        let changed = self.upsert(identity, IssuerAuthorization::granted(display_name))?;
        if changed {
            tracing::info!(issuer = %identity, display_name, "issuer authorized");
        }
        Ok(())
    }

    /// Withdraw an issuer's authorization. Records it already issued keep
    /// their snapshot of its name and their verified status.
    ///
    /// Returns whether the identity was authorized before the call.
    pub fn revoke(&self, caller: &Identity, identity: &Identity) -> Result<bool, RegistryError> {
        self.require_admin(caller)?;
        let Some(current) = self.entry(identity) else {
            return Ok(false);
        };
        if !current.authorized {
            return Ok(false);
        }
        self.upsert(
            identity,
            IssuerAuthorization {
                authorized: false,
                display_name: current.display_name,
            },
        )?;
        tracing::info!(issuer = %identity, "issuer revoked");
        Ok(true)
    }

    /// Whether `identity` may currently issue official documents.
    pub fn is_authorized(&self, identity: &Identity) -> bool {
        self.entries
            .get(identity)
            .map(|e| e.authorized)
            .unwrap_or(false)
    }

    /// Display name of an authorized issuer; `None` for unknown or revoked
    /// identities.
    pub fn display_name(&self, identity: &Identity) -> Option<String> {
        self.entries
            .get(identity)
            .filter(|e| e.authorized)
            .map(|e| e.display_name.clone())
    }

    /// Raw directory entry, including revoked issuers.
    pub fn entry(&self, identity: &Identity) -> Option<IssuerAuthorization> {
        self.entries.get(identity).map(|e| e.clone())
    }

    /// Every entry, sorted by identity.
    pub fn list(&self) -> Vec<(Identity, IssuerAuthorization)> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Number of currently authorized issuers.
    pub fn authorized_count(&self) -> usize {
        self.entries.iter().filter(|e| e.authorized).count()
    }

    fn require_admin(&self, caller: &Identity) -> Result<(), RegistryError> {
        if self.admin.as_ref() == Some(caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, "non-admin attempted issuer directory change");
            Err(RegistryError::PermissionDenied(caller.clone()))
        }
    }

    /// Persist and apply an authorization while holding the entry lock.
    /// Returns whether anything changed.
    fn upsert(
        &self,
        identity: &Identity,
        authorization: IssuerAuthorization,
    ) -> Result<bool, RegistryError> {
        match self.entries.entry(identity.clone()) {
            Entry::Occupied(mut slot) => {
                if *slot.get() == authorization {
                    return Ok(false);
                }
                self.store.put_issuer(identity, &authorization)?;
                slot.insert(authorization);
            }
            Entry::Vacant(slot) => {
                self.store.put_issuer(identity, &authorization)?;
                slot.insert(authorization);
            }
        }
        Ok(true)
    }
}
