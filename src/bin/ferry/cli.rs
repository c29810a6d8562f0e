//! CLI definitions using clap.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use ferry::util::Config;

/// ferry - Build Rust crates with cargo and collect their native artifacts
#[derive(Parser)]
#[command(name = "ferry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of .ferry/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a crate and optionally copy its artifacts
    Build(BuildArgs),

    /// Run `cargo test` on a crate
    Test(TestArgs),

    /// List the files a build is expected to produce
    Artifacts(ArtifactsArgs),

    /// Show the host platform and its file naming conventions
    Platform,

    /// Check that cargo is installed and working
    Toolchain(ToolchainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that works on a crate.
#[derive(Args)]
pub struct CrateArgs {
    /// Crate directory (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Root directory for build outputs
    #[arg(long, value_name = "DIR")]
    pub target_root: Option<PathBuf>,

    /// Cargo executable to use
    #[arg(long, value_name = "PATH")]
    pub cargo_path: Option<String>,

    /// Build in release mode
    #[arg(short, long)]
    pub release: bool,

    /// Features to activate (comma separated or repeated)
    #[arg(short = 'F', long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Activate all available features
    #[arg(long)]
    pub all_features: bool,

    /// Do not activate the `default` feature
    #[arg(long)]
    pub no_default_features: bool,

    /// Build tests too
    #[arg(long)]
    pub tests: bool,

    /// Environment variable for cargo, as KEY=VALUE
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Cargo verbosity: -q, -v or -vv
    #[arg(long, allow_hyphen_values = true)]
    pub verbosity: Option<String>,

    /// Do nothing and exit successfully
    #[arg(long)]
    pub skip: bool,

    /// Extra arguments passed to cargo verbatim
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}

impl CrateArgs {
    /// Settings given on the command line, as a config layer.
    pub fn overrides(&self) -> Result<Config> {
        let mut config = Config::default();
        let build = &mut config.build;

        build.path = self.path.clone();
        build.target_root = self.target_root.clone();
        build.cargo_path = self.cargo_path.clone();
        build.release = self.release.then_some(true);
        build.all_features = self.all_features.then_some(true);
        build.no_default_features = self.no_default_features.then_some(true);
        build.tests = self.tests.then_some(true);
        build.verbosity = self.verbosity.clone();
        if !self.features.is_empty() {
            build.features = Some(self.features.clone());
        }
        if !self.extra_args.is_empty() {
            build.extra_args = Some(self.extra_args.clone());
        }

        for pair in &self.env {
            let Some((key, value)) = pair.split_once('=') else {
                bail!("invalid --env `{}`: expected KEY=VALUE", pair);
            };
            if key.is_empty() {
                bail!("invalid --env `{}`: empty variable name", pair);
            }
            config.env.insert(key.to_string(), value.to_string());
        }

        Ok(config)
    }
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub krate: CrateArgs,

    /// Copy the built artifacts into this directory
    #[arg(long, value_name = "DIR")]
    pub copy_to: Option<PathBuf>,

    /// Nest copies under a `{os}-{arch}` subdirectory
    #[arg(long)]
    pub copy_with_platform_dir: bool,
}

#[derive(Args)]
pub struct TestArgs {
    #[command(flatten)]
    pub krate: CrateArgs,
}

#[derive(Args)]
pub struct ArtifactsArgs {
    #[command(flatten)]
    pub krate: CrateArgs,

    /// Print the artifacts as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ToolchainArgs {
    /// Cargo executable to check
    #[arg(long, value_name = "PATH")]
    pub cargo_path: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
