//! `ferry build` command

use std::path::Path;

use anyhow::Result;

use crate::cli::BuildArgs;
use crate::commands::load_settings;
use ferry::ops::ferry_build::build;
use ferry::RustCrate;

pub fn execute(args: BuildArgs, config_file: Option<&Path>) -> Result<()> {
    let mut overrides = args.krate.overrides()?;
    overrides.build.copy_to = args.copy_to;
    overrides.build.copy_with_platform_dir = args.copy_with_platform_dir.then_some(true);

    let (cwd, config) = load_settings(config_file, overrides)?;
    let crate_root = config.crate_root(&cwd);

    if args.krate.skip || !config.is_enabled() {
        tracing::info!("Skipping build of {}", crate_root.display());
        return Ok(());
    }

    let params = config.build_parameters(&cwd)?;
    let profile = params.profile;
    let krate = RustCrate::new(&crate_root, &config.target_root(&cwd), params)?;

    let result = build(&krate)?;

    eprintln!("    Finished {} [{}]", krate.name(), profile);
    for artifact in &result.artifacts {
        eprintln!("    Artifact {} {}", artifact.kind, artifact.path.display());
    }
    for copied in &result.copied {
        eprintln!("      Copied {}", copied.display());
    }

    Ok(())
}
