//! `stackwell init`: Write a starter node configuration.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the config file.
    #[arg(short, long, default_value = "stackwell.toml")]
    pub config: PathBuf,

    /// Administrator identity allowed to manage issuers.
    #[arg(short, long)]
    pub admin: Option<String>,

    /// Authorize the administrator as an issuer under this name.
    #[arg(long)]
    pub issuer_name: Option<String>,

    /// Data directory for the node's database.
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

/// Render the config file contents.
pub fn render(args: &InitArgs) -> anyhow::Result<String> {
    if args.issuer_name.is_some() && args.admin.is_none() {
        anyhow::bail!("--issuer-name requires --admin");
    }

    let mut out = String::new();
    out.push_str("name = \"stackwell-node\"\n\n");
    out.push_str("[api]\nlisten_addr = \"127.0.0.1\"\nport = 9101\ncommand_queue = 256\n\n");
    out.push_str(&format!(
        "[storage]\ndata_dir = {}\nephemeral = false\n\n",
        toml_string(&args.data_dir.display().to_string())
    ));
    out.push_str("[logging]\nlevel = \"info\"\nformat = \"text\"\n\n");
    out.push_str("[registry]\n");
    if let Some(ref admin) = args.admin {
        out.push_str(&format!("admin = {}\n", toml_string(admin)));
        if let Some(ref name) = args.issuer_name {
            out.push_str(&format!(
                "\n[[registry.bootstrap_issuers]]\nidentity = {}\ndisplay_name = {}\n",
                toml_string(admin),
                toml_string(name)
            ));
        }
    }
    Ok(out)
}

fn toml_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    if args.config.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.config.display()
        );
    }

    let contents = render(args)?;
    if let Some(parent) = args.config.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&args.config, contents)?;

    println!("Wrote {}", args.config.display());
    if args.admin.is_none() {
        println!("  No administrator set; the issuer directory will be read-only.");
    }
    println!();
    println!("Start the node with:");
    println!("  stackwell-node --config {}", args.config.display());
    Ok(())
}
