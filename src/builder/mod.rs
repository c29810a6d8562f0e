//! Cargo build orchestration.
//!
//! This module drives cargo: build parameters, the cargo invocation itself,
//! and the toolchain diagnostics used when an invocation fails.

pub mod cargo;
pub mod params;
pub mod toolchain;

pub use cargo::RustCrate;
pub use params::{BuildParameters, Verbosity, DEFAULT_CARGO};
pub use toolchain::InstallState;
