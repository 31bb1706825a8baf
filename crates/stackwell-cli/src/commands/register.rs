//! `stackwell register`: Self-register a document. The record starts pending.

use clap::Args;
use serde::Serialize;

use super::{ContentSource, DocumentView, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Identity of the document owner.
    #[arg(short, long)]
    pub owner: String,

    #[command(flatten)]
    pub source: ContentSource,

    /// Document classification, e.g. "Diploma".
    #[arg(short = 't', long = "type")]
    pub document_type: String,

    /// Locality the document belongs to.
    #[arg(short, long)]
    pub jurisdiction: String,

    /// Hash or locator of a preview image.
    #[arg(long)]
    pub aux_hash: Option<String>,

    /// Pointer to externally stored metadata.
    #[arg(long)]
    pub metadata_uri: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct RegisterRequest {
    owner: String,
    document_type: String,
    content_hash: String,
    aux_hash: Option<String>,
    metadata_uri: Option<String>,
    jurisdiction: String,
}

pub async fn run(args: &RegisterArgs) -> anyhow::Result<()> {
    let url = super::api_url(&args.endpoint, &["api", "v1", "documents", "register"])?;
    let body = RegisterRequest {
        owner: args.owner.clone(),
        document_type: args.document_type.clone(),
        content_hash: args.source.resolve()?,
        aux_hash: args.aux_hash.clone(),
        metadata_uri: args.metadata_uri.clone(),
        jurisdiction: args.jurisdiction.clone(),
    };

    tracing::debug!(%url, content_hash = %body.content_hash, "sending registration request");
    let client = reqwest::Client::new();
    let resp = client.post(url).json(&body).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let doc: DocumentView = r.json().await?;
            println!("Document registered!");
            doc.print();
        }
        Ok(r) => return Err(super::failure("registration", r).await),
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
