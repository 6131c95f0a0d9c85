//! Manifest inspection command

use clap::Args;
use permcheck_core::{parse_manifest_file, ExError};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Merged manifest to read
    pub manifest: PathBuf,
}

pub fn execute(args: ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let entries = parse_manifest_file(&args.manifest).map_err(ExError::from)?;
    for entry in &entries {
        println!("{}", entry);
    }
    Ok(())
}
