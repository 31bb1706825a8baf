use serde::{Deserialize, Serialize};

use crate::types::Identity;

/// An issuer authorized at startup on behalf of the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerSeed {
    /// Identity of the issuer.
    pub identity: Identity,
    /// Display name snapshotted into the records it issues.
    pub display_name: String,
}

/// Registry-level settings shared by every host of the registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Administrative identity allowed to change issuer authorizations.
    /// With no admin configured the issuer directory is read-only.
    #[serde(default)]
    pub admin: Option<Identity>,
    /// Issuers authorized when the registry opens.
    #[serde(default)]
    pub bootstrap_issuers: Vec<IssuerSeed>,
}

impl RegistryConfig {
    /// Config with the given administrator and no bootstrap issuers.
    pub fn with_admin(admin: Identity) -> Self {
        Self {
            admin: Some(admin),
            bootstrap_issuers: Vec::new(),
        }
    }

    /// Add a bootstrap issuer.
    pub fn with_issuer(mut self, identity: Identity, display_name: impl Into<String>) -> Self {
        self.bootstrap_issuers.push(IssuerSeed {
            identity,
            display_name: display_name.into(),
        });
        self
    }

    /// Whether `identity` is the configured administrator.
    pub fn is_admin(&self, identity: &Identity) -> bool {
        self.admin.as_ref() == Some(identity)
    }
}
