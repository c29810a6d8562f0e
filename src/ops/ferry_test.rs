//! Implementation of `ferry test`.

use crate::builder::RustCrate;
use crate::util::errors::FerryResult;

/// Run `cargo test` with the crate's build parameters.
///
/// Nothing is copied; test binaries are left in the target directory.
pub fn test(krate: &RustCrate) -> FerryResult<()> {
    tracing::info!("Testing {}", krate.name());
    krate.test()
}
