//! Subcommand implementations and the pieces they share.

pub mod authorize;
pub mod hash;
pub mod init;
pub mod issue;
pub mod issuer;
pub mod list;
pub mod register;
pub mod revoke;
pub mod show;
pub mod start;
pub mod status;
pub mod verify;

use clap::Args;
use serde::Deserialize;
use std::path::PathBuf;

/// API endpoint of a node started with default settings.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9101";

/// Where a document's content hash comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ContentSource {
    /// File to hash locally; its bytes never leave this machine.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Precomputed content hash (hex, optional 0x prefix).
    #[arg(long)]
    pub hash: Option<String>,
}

impl ContentSource {
    /// Canonical hash string for the request.
    pub fn resolve(&self) -> anyhow::Result<String> {
        match (&self.file, &self.hash) {
            (Some(path), _) => Ok(stackwell_crypto::digest_file(path)?.to_hex()),
            (None, Some(hash)) => Ok(stackwell_crypto::normalize_hash(hash)?.to_hex()),
            (None, None) => anyhow::bail!("either --file or --hash is required"),
        }
    }
}

#[derive(Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub kind: String,
}

/// A document record as returned by the node.
#[derive(Deserialize)]
pub struct DocumentView {
    pub id: u64,
    pub owner: String,
    pub content_hash: String,
    pub aux_hash: Option<String>,
    pub document_type: String,
    pub jurisdiction: String,
    pub metadata_uri: String,
    pub issuer: String,
    pub issuer_name: String,
    pub timestamp: String,
    pub status: String,
}

impl DocumentView {
    pub fn print(&self) {
        println!("Document #{}", self.id);
        println!("  Type:          {}", self.document_type);
        println!("  Status:        {}", self.status);
        println!("  Owner:         {}", self.owner);
        println!("  Content hash:  {}", self.content_hash);
        if let Some(ref aux) = self.aux_hash {
            println!("  Preview hash:  {}", aux);
        }
        println!("  Jurisdiction:  {}", self.jurisdiction);
        if !self.metadata_uri.is_empty() {
            println!("  Metadata:      {}", self.metadata_uri);
        }
        if self.issuer_name.is_empty() {
            println!("  Issuer:        {} (self-registered)", self.issuer);
        } else {
            println!("  Issuer:        {} ({})", self.issuer_name, self.issuer);
        }
        println!("  Registered:    {}", self.timestamp);
    }
}

/// Join path segments onto the node endpoint, percent-encoding each one.
pub fn api_url(endpoint: &str, segments: &[&str]) -> anyhow::Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(endpoint)
        .map_err(|e| anyhow::anyhow!("invalid endpoint {}: {}", endpoint, e))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("invalid endpoint {}: cannot hold a path", endpoint))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn a non-success response into an error carrying the node's message.
pub async fn failure(action: &str, resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    match resp.json::<ErrorResponse>().await {
        Ok(err) if !err.kind.is_empty() => {
            anyhow::anyhow!("{} failed (HTTP {}, {}): {}", action, status, err.kind, err.error)
        }
        Ok(err) => anyhow::anyhow!("{} failed (HTTP {}): {}", action, status, err.error),
        Err(_) => anyhow::anyhow!("{} failed (HTTP {})", action, status),
    }
}

/// Print the standard hint for an unreachable node.
pub fn unreachable(endpoint: &str, err: &reqwest::Error) {
    println!("Could not reach node at {}", endpoint);
    println!("  Error: {}", err);
    println!();
    println!("Is the node running? Start it with: stackwell-node");
}
