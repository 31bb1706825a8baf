//! `stackwell verify`: Check whether a document is registered, and how.

use clap::Args;
use serde::Deserialize;

use super::{ContentSource, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub source: ContentSource,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    content_hash: String,
    exists: bool,
    document_type: String,
    issuer_name: String,
    jurisdiction: String,
    timestamp: Option<String>,
    status: Option<String>,
}

pub async fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let hash = args.source.resolve()?;
    let url = super::api_url(&args.endpoint, &["api", "v1", "verify", hash.as_str()])?;
    let resp = reqwest::get(url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: VerifyResponse = r.json().await?;
            if !data.exists {
                println!("Document NOT FOUND");
                println!("  Hash: {}", data.content_hash);
                return Ok(());
            }
            let status = data.status.unwrap_or_default();
            println!("Document is REGISTERED ({})", status);
            println!("  Hash:          {}", data.content_hash);
            println!("  Type:          {}", data.document_type);
            println!("  Jurisdiction:  {}", data.jurisdiction);
            if data.issuer_name.is_empty() {
                println!("  Issuer:        (self-registered)");
            } else {
                println!("  Issuer:        {}", data.issuer_name);
            }
            if let Some(ts) = data.timestamp {
                println!("  Registered:    {}", ts);
            }
        }
        Ok(r) => return Err(super::failure("verification", r).await),
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
