//! Stackwell CLI: hash, register and verify documents.
//!
//! Subcommands: init, start, status, hash, register, issue, verify, show,
//! list, authorize, revoke, issuer.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Stackwell: Content-addressed document registry.
#[derive(Parser, Debug)]
#[command(name = "stackwell", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a starter node configuration.
    Init(commands::init::InitArgs),
    /// Start the Stackwell node.
    Start(commands::start::StartArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
    /// Compute content hashes locally.
    Hash(commands::hash::HashArgs),
    /// Self-register a document (pending verification).
    Register(commands::register::RegisterArgs),
    /// Issue a verified document as an authorized issuer.
    Issue(commands::issue::IssueArgs),
    /// Verify a document by hash or file.
    Verify(commands::verify::VerifyArgs),
    /// Show a document by id.
    Show(commands::show::ShowArgs),
    /// List the documents an identity owns.
    List(commands::list::ListArgs),
    /// Authorize an issuer.
    Authorize(commands::authorize::AuthorizeArgs),
    /// Revoke an issuer.
    Revoke(commands::revoke::RevokeArgs),
    /// Look up an issuer.
    Issuer(commands::issuer::IssuerArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Start(args) => commands::start::run(args),
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Hash(args) => commands::hash::run(args),
        Commands::Register(args) => commands::register::run(args).await,
        Commands::Issue(args) => commands::issue::run(args).await,
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::Show(args) => commands::show::run(args).await,
        Commands::List(args) => commands::list::run(args).await,
        Commands::Authorize(args) => commands::authorize::run(args).await,
        Commands::Revoke(args) => commands::revoke::run(args).await,
        Commands::Issuer(args) => commands::issuer::run(args).await,
    }
}
