//! `stackwell revoke`: Revoke an issuer (administrator only).

use clap::Args;
use serde::Serialize;

use super::issuer::IssuerResponse;
use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Administrator identity making the request.
    #[arg(short, long)]
    pub caller: String,

    /// Identity to revoke.
    #[arg(short, long)]
    pub identity: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct RevokeRequest {
    caller: String,
    identity: String,
}

pub async fn run(args: &RevokeArgs) -> anyhow::Result<()> {
    let url = super::api_url(&args.endpoint, &["api", "v1", "issuers", "revoke"])?;
    let body = RevokeRequest {
        caller: args.caller.clone(),
        identity: args.identity.clone(),
    };

    let client = reqwest::Client::new();
    let resp = client.post(url).json(&body).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: IssuerResponse = r.json().await?;
            println!("Issuer revoked. Documents it already issued stay verified.");
            data.print();
        }
        Ok(r) => return Err(super::failure("revocation", r).await),
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
