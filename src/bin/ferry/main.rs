//! ferry CLI - Build Rust crates with cargo and collect their native artifacts

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

use ferry::FerryError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(help) = e.downcast_ref::<FerryError>().and_then(|err| err.help()) {
            eprintln!("help: {}", help);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("ferry=debug")
        } else {
            EnvFilter::new("ferry=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let config = cli.config.as_deref();

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, config),
        Commands::Test(args) => commands::test::execute(args, config),
        Commands::Artifacts(args) => commands::artifacts::execute(args, config),
        Commands::Platform => commands::platform::execute(),
        Commands::Toolchain(args) => commands::toolchain::execute(args, config),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
