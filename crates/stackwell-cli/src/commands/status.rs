//! `stackwell status`: Query the status of a running Stackwell node.

use clap::Args;
use serde::Deserialize;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    version: String,
    name: String,
    documents: usize,
    verified_documents: usize,
    authorized_issuers: usize,
    uptime_secs: u64,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let url = super::api_url(&args.endpoint, &["api", "v1", "status"])?;
    let resp = reqwest::get(url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let status: StatusResponse = r.json().await?;
            println!("Node Status:");
            println!("  Name:       {}", status.name);
            println!("  Version:    {}", status.version);
            println!(
                "  Documents:  {} ({} verified)",
                status.documents, status.verified_documents
            );
            println!("  Issuers:    {}", status.authorized_issuers);
            println!("  Uptime:     {}s", status.uptime_secs);
        }
        Ok(r) => {
            anyhow::bail!("node returned HTTP {}", r.status());
        }
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
