use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Length in bytes of a content digest.
pub const HASH_LEN: usize = 32;

/// Identity of a party interacting with the registry (wallet address, DID,
/// account name). The registry trusts whatever identity it is handed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Create an identity, trimming surrounding whitespace.
    pub fn new(value: impl AsRef<str>) -> Result<Self, CoreError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidIdentity("identity must not be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl FromStr for Identity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 256-bit content digest.
///
/// The canonical text form is `0x` followed by 64 lowercase hex characters.
/// Parsing is lenient about case, an optional `0x`/`0X` prefix, and
/// surrounding whitespace, so that every spelling of the same digest compares
/// equal once parsed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash([u8; HASH_LEN]);

impl ContentHash {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a hash string into its canonical form.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != HASH_LEN * 2 {
            return Err(CoreError::InvalidHash(format!(
                "expected {} hex characters, got {}",
                HASH_LEN * 2,
                digits.len()
            )));
        }

        let mut bytes = [0u8; HASH_LEN];
        hex::decode_to_slice(digits.to_ascii_lowercase(), &mut bytes)
            .map_err(|e| CoreError::InvalidHash(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Canonical `0x`-prefixed lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl TryFrom<String> for ContentHash {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.to_hex()
    }
}

impl FromStr for ContentHash {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

/// Identifier of a document record. Assigned from a strictly increasing
/// counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

impl DocumentId {
    /// The numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Big-endian key bytes, so that byte order matches id order.
    pub fn to_key(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Decode a key produced by [`DocumentId::to_key`].
    pub fn from_key(key: &[u8]) -> Result<Self, CoreError> {
        let bytes: [u8; 8] = key.try_into().map_err(|_| {
            CoreError::InvalidDocumentId(format!("key must be 8 bytes, got {}", key.len()))
        })?;
        Ok(Self(u64::from_be_bytes(bytes)))
    }
}

impl FromStr for DocumentId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| CoreError::InvalidDocumentId(format!("{}: {}", s, e)))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Verification status of a record, derived from `is_verified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Self-registered, not countersigned by an issuer.
    Pending,
    /// Issued by an authorized issuer.
    Verified,
}

impl VerificationStatus {
    /// Status corresponding to an `is_verified` flag.
    pub fn from_flag(is_verified: bool) -> Self {
        if is_verified {
            Self::Verified
        } else {
            Self::Pending
        }
    }

    /// Whether the status is [`VerificationStatus::Verified`].
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Verified => write!(f, "verified"),
        }
    }
}

/// A registered document. Records are append-only: once created, no field
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Record identifier.
    pub id: DocumentId,
    /// Party that submitted the document.
    pub owner: Identity,
    /// Digest of the original file bytes. Unique across the registry.
    pub content_hash: ContentHash,
    /// Digest or locator of a secondary artifact, such as a preview image.
    pub aux_hash: Option<String>,
    /// Free-text classification (e.g. "Diploma").
    pub document_type: String,
    /// Free-text locality.
    pub jurisdiction: String,
    /// Pointer to externally stored descriptive metadata.
    pub metadata_uri: String,
    /// Countersigning authority, or the owner for self-registered records.
    pub issuer: Identity,
    /// Issuer display name as it was at creation time.
    pub issuer_name: String,
    /// True iff the record was created through authority issuance.
    pub is_verified: bool,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl DocumentRecord {
    /// Derived verification status.
    pub fn status(&self) -> VerificationStatus {
        VerificationStatus::from_flag(self.is_verified)
    }

    /// Whether the record was self-registered by its owner.
    pub fn is_self_registered(&self) -> bool {
        self.issuer == self.owner && !self.is_verified
    }
}
