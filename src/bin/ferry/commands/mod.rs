//! Command implementations

pub mod artifacts;
pub mod build;
pub mod completions;
pub mod platform;
pub mod toolchain;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use ferry::util::config::{global_config_path, load_config, project_config_path};
use ferry::util::Config;

/// Load the config layers for a command run from the current directory.
///
/// `config_file` replaces the project config; `overrides` (the command
/// line) is applied last.
pub fn load_settings(config_file: Option<&Path>, overrides: Config) -> Result<(PathBuf, Config)> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let project = match config_file {
        Some(file) => cwd.join(file),
        None => project_config_path(&cwd),
    };
    let global = global_config_path();

    let mut config = load_config(global.as_deref(), &project);
    config.merge(overrides);

    Ok((cwd, config))
}
