//! Running cargo on a crate.
//!
//! [`RustCrate`] ties one crate root to its parsed manifest, its target
//! directory and the caller's [`BuildParameters`]. It builds the cargo
//! argument vector, runs cargo with its output streamed to the log, and
//! turns failures into typed errors.

use std::path::{Path, PathBuf};

use crate::builder::params::BuildParameters;
use crate::builder::toolchain;
use crate::core::artifact::{self, ArtifactSpec};
use crate::core::manifest::Manifest;
use crate::core::platform::{Conventions, Platform};
use crate::util::errors::{FerryError, FerryResult};
use crate::util::process::ProcessBuilder;
use crate::util::shlex;

/// A crate to be built with cargo.
#[derive(Debug, Clone)]
pub struct RustCrate {
    root: PathBuf,
    target_dir: PathBuf,
    params: BuildParameters,
    manifest: Manifest,
}

impl RustCrate {
    /// Open the crate at `crate_root`, parsing its manifest.
    ///
    /// Cargo output goes to `{target_root}/{crate directory name}`. A
    /// malformed manifest fails here, before anything is launched.
    pub fn new(crate_root: &Path, target_root: &Path, params: BuildParameters) -> FerryResult<Self> {
        let root = absolute(crate_root);
        let manifest = Manifest::parse(&root)?;

        let dir_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| manifest.package_name().to_string());
        let target_dir = absolute(target_root).join(dir_name);
        tracing::debug!("Read {}", manifest.path().display());

        Ok(RustCrate {
            root,
            target_dir,
            params,
            manifest,
        })
    }

    /// Crate root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory name of the crate root, used to label log output.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.manifest.package_name().to_string())
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The `--target-dir` handed to cargo.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn params(&self) -> &BuildParameters {
        &self.params
    }

    /// Files the build is expected to produce, library first.
    pub fn artifacts(&self, conventions: &Conventions) -> Vec<ArtifactSpec> {
        artifact::resolve(
            &self.manifest,
            &self.target_dir,
            self.params.profile,
            conventions,
        )
    }

    /// Cargo executable with `~/` expanded on non-Windows hosts.
    pub fn cargo_path(&self) -> String {
        host_cargo_path(&self.params.cargo_path)
    }

    /// Arguments for `cargo {subcommand}`, program name excluded.
    pub fn cargo_args(&self, subcommand: &str) -> Vec<String> {
        let params = &self.params;
        let mut args = vec![
            subcommand.to_string(),
            "--target-dir".to_string(),
            self.target_dir.to_string_lossy().into_owned(),
        ];

        if let Some(flag) = params.verbosity.flag() {
            args.push(flag.to_string());
        }

        if params.profile.is_release() {
            args.push("--release".to_string());
        }

        if params.all_features {
            args.push("--all-features".to_string());
        }

        if params.no_default_features {
            args.push("--no-default-features".to_string());
        }

        let features = params.cleaned_features();
        if !features.is_empty() {
            args.push("--features".to_string());
            args.push(features.join(","));
        }

        if params.tests {
            args.push("--tests".to_string());
        }

        args.extend(params.extra_args.iter().cloned());
        args
    }

    /// The full cargo command for `subcommand`.
    pub fn command(&self, subcommand: &str) -> ProcessBuilder {
        ProcessBuilder::new(self.cargo_path())
            .args(self.cargo_args(subcommand))
            .envs(&self.params.env)
            .cwd(&self.root)
    }

    /// Run `cargo build`.
    pub fn build(&self) -> FerryResult<()> {
        self.run("build")
    }

    /// Run `cargo test`.
    pub fn test(&self) -> FerryResult<()> {
        self.run("test")
    }

    fn run(&self, subcommand: &str) -> FerryResult<()> {
        let cmd = self.command(subcommand);
        let cargo = cmd.get_program().to_string_lossy().into_owned();

        if let Some(cwd) = cmd.get_cwd() {
            tracing::info!("Working directory: {}", shlex::quote(&cwd.to_string_lossy()));
        }
        if !cmd.get_envs().is_empty() {
            tracing::info!("Environment variables:");
            for (key, value) in cmd.get_envs() {
                tracing::info!("  {}={}", key, shlex::quote(value));
            }
        }
        let command = cmd.display_command();
        tracing::info!("Running: {}", command);

        match cmd.exec_streaming(|line| tracing::info!(target: "ferry::cargo", "{}", line)) {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => {
                toolchain::check(&cargo)?;
                Err(FerryError::ToolchainInvocation {
                    command,
                    code: status.code(),
                })
            }
            Err(source) => {
                toolchain::check(&cargo)?;
                Err(FerryError::ToolchainLaunch { cargo, source })
            }
        }
    }
}

/// Expand a leading `~/` in `path` against the current user's home.
pub fn host_cargo_path(path: &str) -> String {
    let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    expand_home(path, &Platform::host(), home.as_deref())
}

/// Expand a leading `~/` to the home directory.
///
/// Windows paths and paths without the prefix are returned unchanged, as is
/// everything when the home directory is unknown.
pub fn expand_home(path: &str, platform: &Platform, home: Option<&Path>) -> String {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) if !platform.is_windows() => {
            home.join(rest).to_string_lossy().into_owned()
        }
        _ => path.to_string(),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
