//! `stackwell list`: List the documents an identity owns.

use clap::Args;
use serde::Deserialize;

use super::{DocumentView, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Owner identity.
    pub owner: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct OwnerDocumentsResponse {
    owner: String,
    documents: Vec<DocumentView>,
    count: usize,
}

pub async fn run(args: &ListArgs) -> anyhow::Result<()> {
    let url = super::api_url(
        &args.endpoint,
        &["api", "v1", "owners", args.owner.as_str(), "documents"],
    )?;
    let resp = reqwest::get(url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: OwnerDocumentsResponse = r.json().await?;
            println!("{} document(s) owned by {}", data.count, data.owner);
            for doc in &data.documents {
                println!(
                    "  #{:<6} {:<9} {:<20} {}",
                    doc.id, doc.status, doc.document_type, doc.content_hash
                );
            }
        }
        Ok(r) => return Err(super::failure("listing", r).await),
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
