//! `stackwell issuer`: Look up an identity in the issuer directory.

use clap::Args;
use serde::Deserialize;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct IssuerArgs {
    /// Identity to look up.
    pub identity: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
pub struct IssuerResponse {
    pub identity: String,
    pub authorized: bool,
    pub display_name: Option<String>,
}

impl IssuerResponse {
    pub fn print(&self) {
        println!("  Identity:    {}", self.identity);
        println!("  Authorized:  {}", if self.authorized { "yes" } else { "no" });
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => println!("  Name:        {}", name),
            Some(_) => println!("  Name:        (none)"),
            None => println!("  Name:        (not in directory)"),
        }
    }
}

pub async fn run(args: &IssuerArgs) -> anyhow::Result<()> {
    let url = super::api_url(
        &args.endpoint,
        &["api", "v1", "issuers", args.identity.as_str()],
    )?;
    let resp = reqwest::get(url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: IssuerResponse = r.json().await?;
            data.print();
        }
        Ok(r) => return Err(super::failure("lookup", r).await),
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
