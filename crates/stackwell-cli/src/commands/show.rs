//! `stackwell show`: Show a document record by id.

use clap::Args;

use super::{DocumentView, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Document id.
    pub id: u64,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(args: &ShowArgs) -> anyhow::Result<()> {
    let id = args.id.to_string();
    let url = super::api_url(&args.endpoint, &["api", "v1", "documents", id.as_str()])?;
    let resp = reqwest::get(url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let doc: DocumentView = r.json().await?;
            doc.print();
        }
        Ok(r) => return Err(super::failure("lookup", r).await),
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
