//! `ferry toolchain` command

use std::path::Path;

use anyhow::Result;

use crate::cli::ToolchainArgs;
use crate::commands::load_settings;
use ferry::builder::cargo::host_cargo_path;
use ferry::builder::toolchain::{self, InstallState};
use ferry::util::process::find_executable;
use ferry::util::Config;

pub fn execute(args: ToolchainArgs, config_file: Option<&Path>) -> Result<()> {
    let mut overrides = Config::default();
    overrides.build.cargo_path = args.cargo_path;

    let (cwd, config) = load_settings(config_file, overrides)?;
    let params = config.build_parameters(&cwd)?;
    let cargo = host_cargo_path(&params.cargo_path);

    println!("Toolchain:");
    println!();
    match find_executable(&cargo) {
        Some(found) => println!("  cargo:  {}", found.display()),
        None => println!("  cargo:  {} (not on PATH)", cargo),
    }

    let state = toolchain::install_state(&cargo);
    let label = match state {
        InstallState::Installed => "installed",
        InstallState::Broken => "broken",
        InstallState::NotInstalled => "not installed",
    };
    println!("  status: {}", label);

    toolchain::check(&cargo)?;

    Ok(())
}
