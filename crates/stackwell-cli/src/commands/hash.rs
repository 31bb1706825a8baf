//! `stackwell hash`: Compute a file's content hash locally.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Files to hash.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn run(args: &HashArgs) -> anyhow::Result<()> {
    for path in &args.files {
        let hash = stackwell_crypto::digest_file(path)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        println!("{}  {}", hash, path.display());
    }
    Ok(())
}
