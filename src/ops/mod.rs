//! High-level operations.
//!
//! This module contains the implementation of ferry commands.

pub mod copy;
pub mod ferry_build;
pub mod ferry_test;

pub use copy::{copy_artifacts, prepare_destination};
pub use ferry_build::{build, BuildResult};
pub use ferry_test::test;
