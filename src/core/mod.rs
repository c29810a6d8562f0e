//! Core data structures for ferry.
//!
//! This module contains the types everything else builds on:
//! - Platform naming conventions
//! - The parsed Cargo.toml view
//! - Build profiles
//! - Artifact resolution

pub mod artifact;
pub mod manifest;
pub mod platform;
pub mod profile;

pub use artifact::{resolve, ArtifactKind, ArtifactSpec};
pub use manifest::{BinEntry, Manifest, MANIFEST_FILE};
pub use platform::{conventions, Conventions, OsFamily, Platform};
pub use profile::BuildProfile;
