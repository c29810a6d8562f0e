//! `ferry artifacts` command
//!
//! Prints the files a build would produce without running cargo.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::ArtifactsArgs;
use crate::commands::load_settings;
use ferry::{Conventions, RustCrate};

pub fn execute(args: ArtifactsArgs, config_file: Option<&Path>) -> Result<()> {
    let (cwd, config) = load_settings(config_file, args.krate.overrides()?)?;

    let params = config.build_parameters(&cwd)?;
    let krate = RustCrate::new(&config.crate_root(&cwd), &config.target_root(&cwd), params)?;
    let artifacts = krate.artifacts(&Conventions::host());

    if args.json {
        let json = serde_json::to_string_pretty(&artifacts)
            .context("failed to serialize artifacts")?;
        println!("{}", json);
        return Ok(());
    }

    if artifacts.is_empty() {
        eprintln!("{} produces no library or binary", krate.name());
    }
    for artifact in &artifacts {
        println!("{}\t{}\t{}", artifact.kind, artifact.logical_name, artifact.path.display());
    }

    Ok(())
}
