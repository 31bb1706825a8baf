//! Stackwell Crypto: the registry's hasher.

pub mod error;
pub mod hashing;

pub use error::CryptoError;
pub use hashing::{digest, digest_file, digest_reader, normalize_hash};
