//! `stackwell start`: Start the Stackwell node.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Path to the config file.
    #[arg(short, long, default_value = "stackwell.toml")]
    pub config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Override the log level.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn run(args: &StartArgs) -> anyhow::Result<()> {
    let mut command = format!("stackwell-node --config {}", args.config.display());
    if let Some(port) = args.api_port {
        command.push_str(&format!(" --api-port {}", port));
    }
    if let Some(ref level) = args.log_level {
        command.push_str(&format!(" --log-level {}", level));
    }

    println!("Starting Stackwell node...");
    println!("  Config: {}", args.config.display());
    println!();
    println!("The registry runs in the stackwell-node binary:");
    println!("  {}", command);

    Ok(())
}
