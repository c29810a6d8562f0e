//! ferry - Build Rust crates with cargo and collect their native artifacts
//!
//! This crate provides the library functionality behind the `ferry` CLI:
//! reading Cargo.toml, predicting the files cargo will produce, running
//! cargo, and copying the results somewhere useful.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and fixtures for ferry unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It lays out throwaway crates and fake build outputs in
/// temporary directories.
#[cfg(test)]
pub mod test_support;

pub use crate::builder::{BuildParameters, RustCrate, Verbosity};
pub use crate::core::{ArtifactKind, ArtifactSpec, BuildProfile, Conventions, Manifest, Platform};
pub use crate::util::errors::{FerryError, FerryResult};
