//! Shared utilities

pub mod config;
pub mod errors;
pub mod process;
pub mod shlex;

pub use config::Config;
pub use errors::{FerryError, FerryResult};
pub use process::ProcessBuilder;
