use std::fs::File;
use std::io::Read;
use std::path::Path;

use stackwell_core::ContentHash;

use crate::error::CryptoError;

/// Read buffer size used when streaming files through the hasher.
const CHUNK_SIZE: usize = 64 * 1024;

/// Hash a document's bytes using BLAKE3.
pub fn digest(data: &[u8]) -> ContentHash {
    ContentHash::from_bytes(*blake3::hash(data).as_bytes())
}

/// Hash everything a reader yields. Produces the same digest as [`digest`]
/// over the concatenated bytes.
pub fn digest_reader<R: Read>(mut reader: R) -> Result<ContentHash, CryptoError> {
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(ContentHash::from_bytes(*hasher.finalize().as_bytes()))
}

/// Hash a file on disk without loading it into memory at once.
pub fn digest_file(path: &Path) -> Result<ContentHash, CryptoError> {
    let file = File::open(path)?;
    let hash = digest_reader(file)?;
    tracing::debug!(path = %path.display(), hash = %hash, "file hashed");
    Ok(hash)
}

/// Normalize a user-supplied hash string (prefix, case, whitespace) into a
/// comparable digest.
pub fn normalize_hash(input: &str) -> Result<ContentHash, CryptoError> {
    Ok(ContentHash::parse(input)?)
}
