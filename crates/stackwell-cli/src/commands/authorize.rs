//! `stackwell authorize`: Authorize an issuer (administrator only).

use clap::Args;
use serde::Serialize;

use super::issuer::IssuerResponse;
use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct AuthorizeArgs {
    /// Administrator identity making the request.
    #[arg(short, long)]
    pub caller: String,

    /// Identity to authorize.
    #[arg(short, long)]
    pub identity: String,

    /// Display name recorded on documents this issuer issues.
    #[arg(short, long)]
    pub name: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct AuthorizeRequest {
    caller: String,
    identity: String,
    display_name: String,
}

pub async fn run(args: &AuthorizeArgs) -> anyhow::Result<()> {
    let url = super::api_url(&args.endpoint, &["api", "v1", "issuers", "authorize"])?;
    let body = AuthorizeRequest {
        caller: args.caller.clone(),
        identity: args.identity.clone(),
        display_name: args.name.clone(),
    };

    let client = reqwest::Client::new();
    let resp = client.post(url).json(&body).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: IssuerResponse = r.json().await?;
            println!("Issuer authorized!");
            data.print();
        }
        Ok(r) => return Err(super::failure("authorization", r).await),
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
